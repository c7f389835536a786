// Boolean row selectors for masked batch operations

use crate::error::{ensure_len, ErrorKind, Result};
use std::ops::Not;

/// A boolean selector over the rows of a batch.
///
/// Operations that take a mask require `mask.len()` to equal the batch count.
/// Operand arrays paired with a mask are matched to the selected rows in
/// ascending index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(bits: Vec<bool>) -> Self {
        Mask { bits }
    }

    /// Mask of `len` rows with every row selected.
    pub fn all(len: usize) -> Self {
        Mask {
            bits: vec![true; len],
        }
    }

    /// Mask of `len` rows with no row selected.
    pub fn none(len: usize) -> Self {
        Mask {
            bits: vec![false; len],
        }
    }

    /// Build a mask of `len` rows selecting the given indices.
    ///
    /// Indices may repeat or appear in any order.
    pub fn from_indices(len: usize, indices: &[usize]) -> Result<Self> {
        let mut bits = vec![false; len];
        for &i in indices {
            if i >= len {
                return Err(ErrorKind::IndexOutOfRange {
                    operation: "Mask::from_indices",
                    index: i,
                    count: len,
                });
            }
            bits[i] = true;
        }
        Ok(Mask { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of selected rows.
    pub fn count_selected(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Selected row indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| if b { Some(i) } else { None })
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Check the mask against a batch of `count` rows and return the number
    /// of selected rows.
    pub(crate) fn validate(&self, operation: &'static str, count: usize) -> Result<usize> {
        ensure_len(operation, "mask", count, self.len())?;
        Ok(self.count_selected())
    }
}

impl From<Vec<bool>> for Mask {
    fn from(bits: Vec<bool>) -> Self {
        Mask::new(bits)
    }
}

impl From<&[bool]> for Mask {
    fn from(bits: &[bool]) -> Self {
        Mask::new(bits.to_vec())
    }
}

impl<const N: usize> From<[bool; N]> for Mask {
    fn from(bits: [bool; N]) -> Self {
        Mask::new(bits.to_vec())
    }
}

impl FromIterator<bool> for Mask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Mask::new(iter.into_iter().collect())
    }
}

impl Not for &Mask {
    type Output = Mask;

    fn not(self) -> Mask {
        self.bits.iter().map(|&b| !b).collect()
    }
}

impl Not for Mask {
    type Output = Mask;

    fn not(self) -> Mask {
        !&self
    }
}

/// Keep the entries of `values` whose mask bit is false.
pub(crate) fn retain_unselected<T>(values: &mut Vec<T>, mask: &Mask) {
    let mut bits = mask.as_slice().iter();
    values.retain(|_| !bits.next().copied().unwrap_or(false));
}

/// Copy out the entries of `values` whose mask bit is true.
pub(crate) fn gather<T: Copy>(values: &[T], mask: &Mask) -> Vec<T> {
    mask.indices().map(|i| values[i]).collect()
}

/// Write `source` into the selected entries of `values`, in index order.
pub(crate) fn scatter<T: Copy>(values: &mut [T], mask: &Mask, source: &[T]) {
    for (i, &v) in mask.indices().zip(source) {
        values[i] = v;
    }
}
