// Photon batches: particle batches that remember where and when each photon
// was emitted.
//
// Units: energy in eV, lengths in cm, emission time in seconds.

use crate::config::Config;
use crate::error::{ensure_len, Result};
use crate::mask::{gather, retain_unselected, scatter, Mask};
use crate::particle::{
    check_finite, check_finite_vectors, ParticleBatch, ParticleState, Particles,
};
use crate::process::Process;
use log::debug;

/// State of a single photon, copied out of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonState {
    pub particle: ParticleState,
    pub emission_time: f64,
    pub emission_coordinates: [f64; 3],
}

/// A batch of photons.
///
/// Movement, deflection and energy loss act on the shared particle fields
/// through [`Particles`]; `add`, `delete`, `replace` and `select` carry the
/// emission time and coordinates through the same row transformation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhotonBatch {
    base: ParticleBatch,
    emission_time: Vec<f64>,
    emission_coordinates: Vec<[f64; 3]>,
}

impl PhotonBatch {
    /// Photons interact through these processes.
    pub const PROCESSES: &'static [Process] =
        &[Process::PhotoelectricEffect, Process::ComptonScattering];

    /// Create a photon batch. Emission coordinates are a snapshot of
    /// `coordinates`; emission times are in seconds.
    pub fn new(
        energy: Vec<f64>,
        direction: Vec<[f64; 3]>,
        coordinates: Vec<[f64; 3]>,
        emission_time: Vec<f64>,
    ) -> Result<Self> {
        Self::with_config(energy, direction, coordinates, emission_time, Config::default())
    }

    pub fn with_config(
        energy: Vec<f64>,
        direction: Vec<[f64; 3]>,
        coordinates: Vec<[f64; 3]>,
        emission_time: Vec<f64>,
        config: Config,
    ) -> Result<Self> {
        ensure_len("new", "emission_time", energy.len(), emission_time.len())?;
        if config.require_finite {
            check_finite("emission_time", &emission_time)?;
        }
        let emission_coordinates = coordinates.clone();
        let base = ParticleBatch::with_config(energy, direction, coordinates, config)?;
        Ok(PhotonBatch {
            base,
            emission_time,
            emission_coordinates,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &Config {
        self.base.config()
    }

    pub fn energy(&self) -> &[f64] {
        self.base.energy()
    }

    pub fn direction(&self) -> &[[f64; 3]] {
        self.base.direction()
    }

    pub fn coordinates(&self) -> &[[f64; 3]] {
        self.base.coordinates()
    }

    pub fn distance_traveled(&self) -> &[f64] {
        self.base.distance_traveled()
    }

    pub fn emission_time(&self) -> &[f64] {
        &self.emission_time
    }

    pub fn emission_coordinates(&self) -> &[[f64; 3]] {
        &self.emission_coordinates
    }

    pub fn count(&self) -> usize {
        self.base.count()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn row(&self, index: usize) -> Result<PhotonState> {
        Ok(PhotonState {
            particle: self.base.row(index)?,
            emission_time: self.emission_time[index],
            emission_coordinates: self.emission_coordinates[index],
        })
    }

    pub fn add(&mut self, other: &PhotonBatch) -> Result<()> {
        self.check_incoming_emission(other)?;
        self.base.add(&other.base)?;
        self.emission_time.extend_from_slice(&other.emission_time);
        self.emission_coordinates
            .extend_from_slice(&other.emission_coordinates);
        Ok(())
    }

    pub fn delete(&mut self, mask: &Mask) -> Result<()> {
        self.base.delete(mask)?;
        retain_unselected(&mut self.emission_time, mask);
        retain_unselected(&mut self.emission_coordinates, mask);
        Ok(())
    }

    /// Overwrite the selected photons, in index order, with the photons of
    /// `other`, emission data included.
    pub fn replace(&mut self, other: &PhotonBatch, mask: &Mask) -> Result<()> {
        // The base batch validates mask and operand before writing anything,
        // so an error here leaves the emission arrays consistent too.
        self.check_incoming_emission(other)?;
        self.base.replace(&other.base, mask)?;
        scatter(&mut self.emission_time, mask, &other.emission_time);
        scatter(&mut self.emission_coordinates, mask, &other.emission_coordinates);
        Ok(())
    }

    pub fn select(&self, mask: &Mask) -> Result<PhotonBatch> {
        let base = self.base.select(mask)?;
        Ok(PhotonBatch {
            base,
            emission_time: gather(&self.emission_time, mask),
            emission_coordinates: gather(&self.emission_coordinates, mask),
        })
    }

    fn check_incoming_emission(&self, other: &PhotonBatch) -> Result<()> {
        if !self.config().require_finite {
            return Ok(());
        }
        check_finite("emission_time", &other.emission_time)?;
        check_finite_vectors("emission_coordinates", &other.emission_coordinates)
    }

    /// Current time (s) of each photon: emission time plus the distance
    /// traveled at the speed of light.
    pub fn arrival_time(&self) -> Vec<f64> {
        self.emission_time
            .iter()
            .zip(self.base.distance_traveled())
            .map(|(&t0, &d)| t0 + d / SPEED_OF_LIGHT_CM_PER_S)
            .collect()
    }

    /// Detach the emission data and return the underlying particle batch.
    pub fn into_particles(self) -> ParticleBatch {
        debug!("into_particles: dropping emission data for {} photons", self.count());
        self.base
    }
}

/// Speed of light in vacuum (cm/s).
pub const SPEED_OF_LIGHT_CM_PER_S: f64 = 2.997_924_58e10;

impl Particles for PhotonBatch {
    const PROCESSES: &'static [Process] = PhotonBatch::PROCESSES;

    fn base(&self) -> &ParticleBatch {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ParticleBatch {
        &mut self.base
    }

    fn add(&mut self, other: &Self) -> Result<()> {
        PhotonBatch::add(self, other)
    }

    fn delete(&mut self, mask: &Mask) -> Result<()> {
        PhotonBatch::delete(self, mask)
    }

    fn replace(&mut self, other: &Self, mask: &Mask) -> Result<()> {
        PhotonBatch::replace(self, other, mask)
    }

    fn select(&self, mask: &Mask) -> Result<Self> {
        PhotonBatch::select(self, mask)
    }
}
