//! Struct-of-arrays particle batches for Monte Carlo transport.
//!
//! A [`ParticleBatch`] stores energy (eV), direction, coordinates (cm) and
//! distance traveled (cm) for N particles in parallel arrays. A
//! [`PhotonBatch`] adds emission time (s) and emission coordinates. Both
//! implement [`Particles`], the interface a transport driver uses to move,
//! deflect and slow down particles and to merge, drop or overwrite the rows
//! picked out by a [`Mask`].

mod config;
mod error;
mod mask;
mod particle;
mod photon;
mod process;
pub mod physics;

pub use config::Config;
pub use error::{ErrorKind, Result};
pub use mask::Mask;
pub use particle::{ParticleBatch, ParticleState, Particles};
pub use photon::{PhotonBatch, PhotonState, SPEED_OF_LIGHT_CM_PER_S};
pub use process::Process;

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
mod python {
    pub mod particles_python;
    pub mod photons_python;
}

#[cfg(feature = "pyo3")]
#[pymodule]
fn mc_particles(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    use crate::python::particles_python;
    use crate::python::photons_python;

    m.add_class::<particles_python::PyParticles>()?;
    m.add_class::<photons_python::PyPhotons>()?;
    Ok(())
}
