use crate::mask::Mask;
use crate::particle::Particles;
use crate::photon::PhotonBatch;
use crate::python::particles_python::py_err;
use pyo3::prelude::*;

#[pyclass(name = "Photons")]
#[derive(Clone)]
pub struct PyPhotons {
    pub inner: PhotonBatch,
}

#[pymethods]
impl PyPhotons {
    #[new]
    pub fn new(
        energy: Vec<f64>,
        direction: Vec<[f64; 3]>,
        coordinates: Vec<[f64; 3]>,
        emission_time: Vec<f64>,
    ) -> PyResult<Self> {
        let inner =
            PhotonBatch::new(energy, direction, coordinates, emission_time).map_err(py_err)?;
        Ok(PyPhotons { inner })
    }

    #[classattr]
    pub fn processes() -> Vec<String> {
        PhotonBatch::PROCESSES.iter().map(|p| p.to_string()).collect()
    }

    pub fn r#move(&mut self, distance: Vec<f64>) -> PyResult<()> {
        self.inner.advance(&distance).map_err(py_err)
    }

    pub fn rotate(&mut self, theta: Vec<f64>, phi: Vec<f64>, mask: Vec<bool>) -> PyResult<()> {
        self.inner
            .rotate(&theta, &phi, &Mask::new(mask))
            .map_err(py_err)
    }

    pub fn change_energy(&mut self, energy_change: Vec<f64>, mask: Vec<bool>) -> PyResult<()> {
        self.inner
            .change_energy(&energy_change, &Mask::new(mask))
            .map_err(py_err)
    }

    pub fn add(&mut self, particles: PyPhotons) -> PyResult<()> {
        self.inner.add(&particles.inner).map_err(py_err)
    }

    pub fn delete(&mut self, mask: Vec<bool>) -> PyResult<()> {
        self.inner.delete(&Mask::new(mask)).map_err(py_err)
    }

    pub fn replace(&mut self, particles: PyPhotons, mask: Vec<bool>) -> PyResult<()> {
        self.inner
            .replace(&particles.inner, &Mask::new(mask))
            .map_err(py_err)
    }

    pub fn select(&self, mask: Vec<bool>) -> PyResult<PyPhotons> {
        let inner = self.inner.select(&Mask::new(mask)).map_err(py_err)?;
        Ok(PyPhotons { inner })
    }

    #[getter]
    pub fn energy(&self) -> Vec<f64> {
        self.inner.energy().to_vec()
    }

    #[getter]
    pub fn direction(&self) -> Vec<[f64; 3]> {
        self.inner.direction().to_vec()
    }

    #[getter]
    pub fn coordinates(&self) -> Vec<[f64; 3]> {
        self.inner.coordinates().to_vec()
    }

    #[getter]
    pub fn distance_traveled(&self) -> Vec<f64> {
        self.inner.distance_traveled().to_vec()
    }

    #[getter]
    pub fn emission_time(&self) -> Vec<f64> {
        self.inner.emission_time().to_vec()
    }

    #[getter]
    pub fn emission_coordinates(&self) -> Vec<[f64; 3]> {
        self.inner.emission_coordinates().to_vec()
    }

    #[getter]
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn __len__(&self) -> usize {
        self.inner.count()
    }

    pub fn __repr__(&self) -> String {
        format!("Photons(count={})", self.inner.count())
    }
}
