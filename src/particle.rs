// Struct-of-arrays particle batches for Monte Carlo transport
//
// Units: energy in eV, lengths in cm, angles in radians.

use crate::config::Config;
use crate::error::{ensure_len, ErrorKind, Result};
use crate::mask::{gather, retain_unselected, scatter, Mask};
use crate::physics;
use crate::process::Process;
use log::{debug, trace};

/// State of a single particle, copied out of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub energy: f64,
    pub direction: [f64; 3],
    pub coordinates: [f64; 3],
    pub distance_traveled: f64,
}

/// A batch of N particles stored as parallel arrays.
///
/// Row `i` of every array describes the same particle, and all arrays always
/// have the same length. Every mutating operation validates its operands
/// before writing, so an `Err` leaves the batch unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleBatch {
    energy: Vec<f64>,
    direction: Vec<[f64; 3]>,
    coordinates: Vec<[f64; 3]>,
    distance_traveled: Vec<f64>,
    config: Config,
}

impl ParticleBatch {
    /// Create a batch from per-particle energies (eV), direction vectors and
    /// coordinates (cm). Distance traveled starts at zero.
    pub fn new(
        energy: Vec<f64>,
        direction: Vec<[f64; 3]>,
        coordinates: Vec<[f64; 3]>,
    ) -> Result<Self> {
        Self::with_config(energy, direction, coordinates, Config::default())
    }

    /// Like [`ParticleBatch::new`], with explicit options.
    pub fn with_config(
        energy: Vec<f64>,
        direction: Vec<[f64; 3]>,
        coordinates: Vec<[f64; 3]>,
        config: Config,
    ) -> Result<Self> {
        let n = energy.len();
        ensure_len("new", "direction", n, direction.len())?;
        ensure_len("new", "coordinates", n, coordinates.len())?;
        if config.require_finite {
            check_finite("energy", &energy)?;
            check_finite_vectors("direction", &direction)?;
            check_finite_vectors("coordinates", &coordinates)?;
        }
        Ok(ParticleBatch {
            energy,
            direction,
            coordinates,
            distance_traveled: vec![0.0; n],
            config,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    pub fn direction(&self) -> &[[f64; 3]] {
        &self.direction
    }

    pub fn coordinates(&self) -> &[[f64; 3]] {
        &self.coordinates
    }

    pub fn distance_traveled(&self) -> &[f64] {
        &self.distance_traveled
    }

    /// Number of particles in the batch.
    pub fn count(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Copy out the state of particle `index`.
    pub fn row(&self, index: usize) -> Result<ParticleState> {
        check_row("row", index, self.count())?;
        Ok(ParticleState {
            energy: self.energy[index],
            direction: self.direction[index],
            coordinates: self.coordinates[index],
            distance_traveled: self.distance_traveled[index],
        })
    }

    /// Move every particle along its direction by `distance[i]` cm.
    ///
    /// Steps must be finite and non-negative so that `distance_traveled`
    /// never decreases.
    pub fn advance(&mut self, distance: &[f64]) -> Result<()> {
        ensure_len("move", "distance", self.count(), distance.len())?;
        if let Some(index) = distance.iter().position(|d| !(d.is_finite() && *d >= 0.0)) {
            return Err(log_rejected(ErrorKind::InvalidDistance {
                operation: "move",
                index,
                value: distance[index],
            }));
        }
        for (((traveled, position), direction), &step) in self
            .distance_traveled
            .iter_mut()
            .zip(self.coordinates.iter_mut())
            .zip(self.direction.iter())
            .zip(distance)
        {
            *traveled += step;
            *position = physics::advance(*position, *direction, step);
        }
        Ok(())
    }

    /// Deflect the directions of the selected particles by polar angle
    /// `theta` and azimuthal angle `phi` (radians). The k-th selected row
    /// takes `theta[k]` and `phi[k]`.
    pub fn rotate(&mut self, theta: &[f64], phi: &[f64], mask: &Mask) -> Result<()> {
        let selected = mask.validate("rotate", self.count())?;
        ensure_len("rotate", "theta", selected, theta.len())?;
        ensure_len("rotate", "phi", selected, phi.len())?;

        let renormalize = self.config.renormalize_on_rotate;
        for ((i, &t), &p) in mask.indices().zip(theta).zip(phi) {
            let deflected = physics::deflect(self.direction[i], t, p);
            self.direction[i] = if renormalize {
                physics::normalize(deflected)
            } else {
                deflected
            };
        }
        trace!("rotate: deflected {} of {} directions", selected, self.count());
        Ok(())
    }

    /// Subtract `energy_change[k]` (eV) from the k-th selected particle.
    pub fn change_energy(&mut self, energy_change: &[f64], mask: &Mask) -> Result<()> {
        let selected = mask.validate("change_energy", self.count())?;
        ensure_len("change_energy", "energy_change", selected, energy_change.len())?;
        for (i, &de) in mask.indices().zip(energy_change) {
            self.energy[i] -= de;
        }
        Ok(())
    }

    /// Rescale the selected direction vectors to unit length.
    pub fn renormalize_directions(&mut self, mask: &Mask) -> Result<()> {
        mask.validate("renormalize_directions", self.count())?;
        for i in mask.indices() {
            self.direction[i] = physics::normalize(self.direction[i]);
        }
        Ok(())
    }

    /// Append the particles of `other`, preserving their order.
    pub fn add(&mut self, other: &ParticleBatch) -> Result<()> {
        self.check_incoming(other).map_err(log_rejected)?;
        let before = self.count();
        self.energy.extend_from_slice(&other.energy);
        self.direction.extend_from_slice(&other.direction);
        self.coordinates.extend_from_slice(&other.coordinates);
        self.distance_traveled.extend_from_slice(&other.distance_traveled);
        debug!("add: {} -> {} particles", before, self.count());
        Ok(())
    }

    /// Remove the selected particles. Remaining particles keep their order.
    pub fn delete(&mut self, mask: &Mask) -> Result<()> {
        let before = self.count();
        mask.validate("delete", before).map_err(log_rejected)?;
        retain_unselected(&mut self.energy, mask);
        retain_unselected(&mut self.direction, mask);
        retain_unselected(&mut self.coordinates, mask);
        retain_unselected(&mut self.distance_traveled, mask);
        debug!("delete: {} -> {} particles", before, self.count());
        Ok(())
    }

    /// Overwrite the selected particles, in index order, with the rows of
    /// `other`. `other` must hold exactly as many particles as are selected.
    pub fn replace(&mut self, other: &ParticleBatch, mask: &Mask) -> Result<()> {
        let selected = mask.validate("replace", self.count()).map_err(log_rejected)?;
        ensure_len("replace", "other", selected, other.count()).map_err(log_rejected)?;
        self.check_incoming(other).map_err(log_rejected)?;
        scatter(&mut self.energy, mask, &other.energy);
        scatter(&mut self.direction, mask, &other.direction);
        scatter(&mut self.coordinates, mask, &other.coordinates);
        scatter(&mut self.distance_traveled, mask, &other.distance_traveled);
        debug!("replace: overwrote {} of {} particles", selected, self.count());
        Ok(())
    }

    /// Rows merged in by `add` or `replace` come from a batch that may have
    /// been built without `require_finite`; re-check them against ours.
    pub(crate) fn check_incoming(&self, other: &ParticleBatch) -> Result<()> {
        if !self.config.require_finite {
            return Ok(());
        }
        check_finite("energy", &other.energy)?;
        check_finite_vectors("direction", &other.direction)?;
        check_finite_vectors("coordinates", &other.coordinates)?;
        check_finite("distance_traveled", &other.distance_traveled)
    }

    /// Copy the selected particles into a new batch with the same options.
    pub fn select(&self, mask: &Mask) -> Result<ParticleBatch> {
        let selected = mask.validate("select", self.count()).map_err(log_rejected)?;
        debug!("select: {} of {} particles", selected, self.count());
        Ok(ParticleBatch {
            energy: gather(&self.energy, mask),
            direction: gather(&self.direction, mask),
            coordinates: gather(&self.coordinates, mask),
            distance_traveled: gather(&self.distance_traveled, mask),
            config: self.config,
        })
    }
}

/// Interface shared by every particle variant.
///
/// A transport driver is generic over this trait: it asks a batch which
/// interaction processes apply to it, moves and deflects particles, and
/// merges, drops or overwrites subsets of them. `advance`, `rotate` and
/// `change_energy` only touch the fields common to all variants, so they are
/// provided here on top of [`Particles::base_mut`].
pub trait Particles: Sized {
    /// Interaction processes the driver may apply to this variant.
    const PROCESSES: &'static [Process];

    fn base(&self) -> &ParticleBatch;

    fn base_mut(&mut self) -> &mut ParticleBatch;

    fn processes(&self) -> &'static [Process] {
        Self::PROCESSES
    }

    fn count(&self) -> usize {
        self.base().count()
    }

    fn advance(&mut self, distance: &[f64]) -> Result<()> {
        self.base_mut().advance(distance)
    }

    fn rotate(&mut self, theta: &[f64], phi: &[f64], mask: &Mask) -> Result<()> {
        self.base_mut().rotate(theta, phi, mask)
    }

    fn change_energy(&mut self, energy_change: &[f64], mask: &Mask) -> Result<()> {
        self.base_mut().change_energy(energy_change, mask)
    }

    fn add(&mut self, other: &Self) -> Result<()>;

    fn delete(&mut self, mask: &Mask) -> Result<()>;

    fn replace(&mut self, other: &Self, mask: &Mask) -> Result<()>;

    fn select(&self, mask: &Mask) -> Result<Self>;
}

impl Particles for ParticleBatch {
    const PROCESSES: &'static [Process] = &[];

    fn base(&self) -> &ParticleBatch {
        self
    }

    fn base_mut(&mut self) -> &mut ParticleBatch {
        self
    }

    fn add(&mut self, other: &Self) -> Result<()> {
        ParticleBatch::add(self, other)
    }

    fn delete(&mut self, mask: &Mask) -> Result<()> {
        ParticleBatch::delete(self, mask)
    }

    fn replace(&mut self, other: &Self, mask: &Mask) -> Result<()> {
        ParticleBatch::replace(self, other, mask)
    }

    fn select(&self, mask: &Mask) -> Result<Self> {
        ParticleBatch::select(self, mask)
    }
}

fn check_row(operation: &'static str, index: usize, count: usize) -> Result<()> {
    if count == 0 {
        return Err(ErrorKind::EmptyBatch { operation });
    }
    if index >= count {
        return Err(ErrorKind::IndexOutOfRange {
            operation,
            index,
            count,
        });
    }
    Ok(())
}

pub(crate) fn check_finite(field: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ErrorKind::NonFinite { field, index }),
        None => Ok(()),
    }
}

pub(crate) fn check_finite_vectors(field: &'static str, values: &[[f64; 3]]) -> Result<()> {
    match values.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
        Some(index) => Err(ErrorKind::NonFinite { field, index }),
        None => Ok(()),
    }
}

pub(crate) fn log_rejected(err: ErrorKind) -> ErrorKind {
    debug!("rejected: {}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_particles() -> ParticleBatch {
        ParticleBatch::new(
            vec![10.0, 20.0],
            vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]],
            vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_batch_construction() {
        let b = two_particles();
        assert_eq!(b.count(), 2);
        assert_eq!(b.energy(), &[10.0, 20.0]);
        assert_eq!(b.distance_traveled(), &[0.0, 0.0]);
        assert!(!b.is_empty());
        assert!(b.processes().is_empty());
    }

    #[test]
    fn test_construction_rejects_ragged_inputs() {
        let err = ParticleBatch::new(vec![1.0, 2.0], vec![[0.0, 0.0, 1.0]], vec![[0.0; 3]; 2])
            .unwrap_err();
        assert_eq!(
            err,
            ErrorKind::ShapeMismatch {
                operation: "new",
                operand: "direction",
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_require_finite() {
        let config = Config {
            require_finite: true,
            ..Config::default()
        };
        let err = ParticleBatch::with_config(
            vec![1.0, f64::NAN],
            vec![[0.0, 0.0, 1.0]; 2],
            vec![[0.0; 3]; 2],
            config,
        )
        .unwrap_err();
        assert_eq!(err, ErrorKind::NonFinite { field: "energy", index: 1 });

        // Without the option NaN is stored as-is
        let b = ParticleBatch::new(vec![f64::NAN], vec![[0.0, 0.0, 1.0]], vec![[0.0; 3]]).unwrap();
        assert!(b.energy()[0].is_nan());
    }

    #[test]
    fn test_move() {
        let mut b = two_particles();
        b.advance(&[5.0, 5.0]).unwrap();
        assert_eq!(b.coordinates(), &[[0.0, 0.0, 5.0], [0.0, 0.0, -5.0]]);
        assert_eq!(b.distance_traveled(), &[5.0, 5.0]);

        b.advance(&[1.0, 2.0]).unwrap();
        assert_eq!(b.distance_traveled(), &[6.0, 7.0]);
    }

    #[test]
    fn test_move_wrong_length_is_rejected() {
        let mut b = two_particles();
        let before = b.clone();
        assert!(matches!(b.advance(&[1.0]), Err(ErrorKind::ShapeMismatch { .. })));
        assert_eq!(b, before);
    }

    #[test]
    fn test_move_rejects_negative_and_nan_steps() {
        let mut b = two_particles();
        b.advance(&[5.0, 5.0]).unwrap();
        let before = b.clone();

        let err = b.advance(&[1.0, -3.0]).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::InvalidDistance {
                operation: "move",
                index: 1,
                value: -3.0,
            }
        );
        assert!(matches!(
            b.advance(&[f64::NAN, 1.0]),
            Err(ErrorKind::InvalidDistance { index: 0, .. })
        ));
        assert!(b.advance(&[f64::INFINITY, 1.0]).is_err());
        assert_eq!(b, before);

        b.advance(&[0.0, 0.0]).unwrap();
        assert_eq!(b.distance_traveled(), &[5.0, 5.0]);
    }

    #[test]
    fn test_require_finite_applies_to_merged_rows() {
        let config = Config {
            require_finite: true,
            ..Config::default()
        };
        let mut strict =
            ParticleBatch::with_config(vec![1.0], vec![[0.0, 0.0, 1.0]], vec![[0.0; 3]], config)
                .unwrap();
        let loose =
            ParticleBatch::new(vec![f64::NAN], vec![[0.0, 0.0, 1.0]], vec![[0.0; 3]]).unwrap();
        let before = strict.clone();

        assert_eq!(
            strict.add(&loose).unwrap_err(),
            ErrorKind::NonFinite { field: "energy", index: 0 }
        );
        assert!(matches!(
            strict.replace(&loose, &Mask::all(1)),
            Err(ErrorKind::NonFinite { field: "energy", .. })
        ));
        assert_eq!(strict, before);

        // A lenient batch still accepts the rows
        let mut lenient = two_particles();
        lenient.add(&loose).unwrap();
        assert!(lenient.energy()[2].is_nan());
    }

    #[test]
    fn test_change_energy() {
        let mut b = two_particles();
        b.change_energy(&[3.0], &Mask::from([true, false])).unwrap();
        assert_eq!(b.energy(), &[7.0, 20.0]);
    }

    #[test]
    fn test_change_energy_count_mismatch() {
        let mut b = two_particles();
        let err = b.change_energy(&[3.0, 4.0], &Mask::from([false, true])).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::ShapeMismatch {
                operation: "change_energy",
                operand: "energy_change",
                expected: 1,
                found: 2,
            }
        );
        assert_eq!(b.energy(), &[10.0, 20.0]);
    }

    #[test]
    fn test_rotate_identity() {
        let mut b = two_particles();
        b.rotate(&[0.0, 0.0], &[0.4, 2.0], &Mask::all(2)).unwrap();
        assert_eq!(b.direction(), two_particles().direction());
    }

    #[test]
    fn test_rotate_only_masked_rows() {
        let mut b = two_particles();
        b.rotate(&[std::f64::consts::FRAC_PI_2], &[0.0], &Mask::from([false, true]))
            .unwrap();
        assert_eq!(b.direction()[0], [0.0, 0.0, 1.0]);
        let d = b.direction()[1];
        assert!((d[0] - 1.0).abs() < 1e-12);
        assert!(d[1].abs() < 1e-12);
        assert!(d[2].abs() < 1e-12);
    }

    #[test]
    fn test_rotate_renormalizes_when_configured() {
        let config = Config {
            renormalize_on_rotate: true,
            ..Config::default()
        };
        let mut b =
            ParticleBatch::with_config(vec![1.0], vec![[0.0, 0.0, 2.0]], vec![[0.0; 3]], config)
                .unwrap();
        b.rotate(&[0.0], &[0.0], &Mask::all(1)).unwrap();
        assert_eq!(b.direction()[0], [0.0, 0.0, 1.0]);

        let mut plain =
            ParticleBatch::new(vec![1.0], vec![[0.0, 0.0, 2.0]], vec![[0.0; 3]]).unwrap();
        plain.rotate(&[0.0], &[0.0], &Mask::all(1)).unwrap();
        assert_eq!(plain.direction()[0], [0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_rotate_rejects_angle_count() {
        let mut b = two_particles();
        let err = b.rotate(&[0.1, 0.2], &[0.1], &Mask::all(2)).unwrap_err();
        assert!(matches!(err, ErrorKind::ShapeMismatch { operand: "phi", .. }));
    }

    #[test]
    fn test_delete() {
        let mut b = two_particles();
        b.delete(&Mask::from([true, false])).unwrap();
        assert_eq!(b.count(), 1);
        assert_eq!(b.energy(), &[20.0]);
        assert_eq!(b.direction(), &[[0.0, 0.0, -1.0]]);
        assert_eq!(b.distance_traveled().len(), 1);
    }

    #[test]
    fn test_add_keeps_distance_traveled() {
        let mut a = two_particles();
        let mut b = two_particles();
        b.advance(&[1.0, 2.0]).unwrap();
        a.add(&b).unwrap();
        assert_eq!(a.count(), 4);
        assert_eq!(a.distance_traveled(), &[0.0, 0.0, 1.0, 2.0]);
        assert_eq!(a.energy(), &[10.0, 20.0, 10.0, 20.0]);
    }

    #[test]
    fn test_replace() {
        let mut b = two_particles();
        let mut other =
            ParticleBatch::new(vec![99.0], vec![[1.0, 0.0, 0.0]], vec![[4.0, 5.0, 6.0]]).unwrap();
        other.advance(&[2.0]).unwrap();

        b.replace(&other, &Mask::from([false, true])).unwrap();
        assert_eq!(b.row(0).unwrap(), two_particles().row(0).unwrap());
        assert_eq!(
            b.row(1).unwrap(),
            ParticleState {
                energy: 99.0,
                direction: [1.0, 0.0, 0.0],
                coordinates: [6.0, 5.0, 6.0],
                distance_traveled: 2.0,
            }
        );
    }

    #[test]
    fn test_replace_size_mismatch_is_atomic() {
        let mut b = two_particles();
        let other = two_particles();
        let before = b.clone();
        let err = b.replace(&other, &Mask::from([true, false])).unwrap_err();
        assert!(matches!(err, ErrorKind::ShapeMismatch { operand: "other", .. }));
        assert_eq!(b, before);
    }

    #[test]
    fn test_select() {
        let b = two_particles();
        let s = b.select(&Mask::from([false, true])).unwrap();
        assert_eq!(s.count(), 1);
        assert_eq!(s.energy(), &[20.0]);
        assert_eq!(s.config(), b.config());
    }

    #[test]
    fn test_row_errors() {
        let b = two_particles();
        assert_eq!(
            b.row(2).unwrap_err(),
            ErrorKind::IndexOutOfRange {
                operation: "row",
                index: 2,
                count: 2,
            }
        );
        assert_eq!(
            ParticleBatch::empty().row(0).unwrap_err(),
            ErrorKind::EmptyBatch { operation: "row" }
        );
    }

    #[test]
    fn test_empty_batch_operations() {
        let mut b = ParticleBatch::empty();
        b.advance(&[]).unwrap();
        b.rotate(&[], &[], &Mask::none(0)).unwrap();
        b.delete(&Mask::none(0)).unwrap();
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn test_renormalize_directions() {
        let mut b = ParticleBatch::new(
            vec![1.0, 1.0],
            vec![[0.0, 3.0, 4.0], [0.0, 0.0, 2.0]],
            vec![[0.0; 3]; 2],
        )
        .unwrap();
        b.renormalize_directions(&Mask::from([true, false])).unwrap();
        assert!((b.direction()[0][1] - 0.6).abs() < 1e-15);
        assert!((b.direction()[0][2] - 0.8).abs() < 1e-15);
        assert_eq!(b.direction()[1], [0.0, 0.0, 2.0]);
    }
}
