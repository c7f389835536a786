use thiserror::Error;

/// Result type used by every fallible batch operation.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Precondition failures raised by batch operations.
///
/// Operations validate all operands before touching any storage, so an `Err`
/// always means the batch was left exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// An operand's length does not match the batch size or the number of
    /// rows selected by a mask.
    #[error("{operation}: `{operand}` has length {found}, expected {expected}")]
    ShapeMismatch {
        operation: &'static str,
        operand: &'static str,
        expected: usize,
        found: usize,
    },

    /// A row index is not smaller than the number of rows.
    #[error("{operation}: index {index} out of range for {count} rows")]
    IndexOutOfRange {
        operation: &'static str,
        index: usize,
        count: usize,
    },

    /// The operation needs at least one particle.
    #[error("{operation}: batch is empty")]
    EmptyBatch { operation: &'static str },

    /// A step length passed to `move` is negative or not finite.
    #[error("{operation}: invalid step {value} at index {index}")]
    InvalidDistance {
        operation: &'static str,
        index: usize,
        value: f64,
    },

    /// A NaN or infinite value was rejected by a batch with
    /// `Config::require_finite` set.
    #[error("non-finite value in `{field}` at index {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ErrorKind {
    pub(crate) fn shape(
        operation: &'static str,
        operand: &'static str,
        expected: usize,
        found: usize,
    ) -> Self {
        ErrorKind::ShapeMismatch {
            operation,
            operand,
            expected,
            found,
        }
    }
}

/// Fails with [`ErrorKind::ShapeMismatch`] unless `found == expected`.
pub(crate) fn ensure_len(
    operation: &'static str,
    operand: &'static str,
    expected: usize,
    found: usize,
) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ErrorKind::shape(operation, operand, expected, found))
    }
}
