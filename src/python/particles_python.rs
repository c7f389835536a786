use crate::error::ErrorKind;
use crate::mask::Mask;
use crate::particle::{ParticleBatch, Particles};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub(crate) fn py_err(e: ErrorKind) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyclass(name = "Particles")]
#[derive(Clone)]
pub struct PyParticles {
    pub inner: ParticleBatch,
}

#[pymethods]
impl PyParticles {
    #[new]
    pub fn new(
        energy: Vec<f64>,
        direction: Vec<[f64; 3]>,
        coordinates: Vec<[f64; 3]>,
    ) -> PyResult<Self> {
        let inner = ParticleBatch::new(energy, direction, coordinates).map_err(py_err)?;
        Ok(PyParticles { inner })
    }

    #[classattr]
    pub fn processes() -> Vec<String> {
        <ParticleBatch as Particles>::PROCESSES
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    /// Move particles along their directions by `distance` (cm).
    pub fn r#move(&mut self, distance: Vec<f64>) -> PyResult<()> {
        self.inner.advance(&distance).map_err(py_err)
    }

    /// Deflect masked particles by `theta` and `phi` (radians).
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

    pub fn add(&mut self, particles: PyParticles) -> PyResult<()> {
        self.inner.add(&particles.inner).map_err(py_err)
    }

    pub fn delete(&mut self, mask: Vec<bool>) -> PyResult<()> {
        self.inner.delete(&Mask::new(mask)).map_err(py_err)
    }

    pub fn replace(&mut self, particles: PyParticles, mask: Vec<bool>) -> PyResult<()> {
        self.inner
            .replace(&particles.inner, &Mask::new(mask))
            .map_err(py_err)
    }

    pub fn select(&self, mask: Vec<bool>) -> PyResult<PyParticles> {
        let inner = self.inner.select(&Mask::new(mask)).map_err(py_err)?;
        Ok(PyParticles { inner })
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
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn __len__(&self) -> usize {
        self.inner.count()
    }

    pub fn __repr__(&self) -> String {
        format!("Particles(count={})", self.inner.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::photons_python::PyPhotons;

    #[test]
    fn test_python_particles_api() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| -> PyResult<()> {
            let particles = PyParticles::new(
                vec![10.0, 20.0],
                vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]],
                vec![[0.0; 3]; 2],
            )?;
            let obj = Py::new(py, particles)?;

            obj.call_method1(py, "move", (vec![5.0, 5.0],))?;
            obj.call_method1(py, "change_energy", (vec![3.0], vec![true, false]))?;
            let coordinates: Vec<[f64; 3]> = obj.getattr(py, "coordinates")?.extract(py)?;
            let energy: Vec<f64> = obj.getattr(py, "energy")?.extract(py)?;
            let count: usize = obj.getattr(py, "count")?.extract(py)?;
            assert_eq!(coordinates, vec![[0.0, 0.0, 5.0], [0.0, 0.0, -5.0]]);
            assert_eq!(energy, vec![7.0, 20.0]);
            assert_eq!(count, 2);

            let err = obj.call_method1(py, "delete", (vec![true],)).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));

            let processes: Vec<String> =
                py.get_type::<PyParticles>().getattr("processes")?.extract()?;
            assert!(processes.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_python_photons_api() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| -> PyResult<()> {
            let photons = PyPhotons::new(
                vec![1.0e5],
                vec![[1.0, 0.0, 0.0]],
                vec![[0.0; 3]],
                vec![0.0],
            )?;
            let obj = Py::new(py, photons)?;

            obj.call_method1(py, "move", (vec![2.0],))?;
            let coordinates: Vec<[f64; 3]> = obj.getattr(py, "coordinates")?.extract(py)?;
            let emitted: Vec<[f64; 3]> = obj.getattr(py, "emission_coordinates")?.extract(py)?;
            assert_eq!(coordinates, vec![[2.0, 0.0, 0.0]]);
            assert_eq!(emitted, vec![[0.0, 0.0, 0.0]]);

            let processes: Vec<String> =
                py.get_type::<PyPhotons>().getattr("processes")?.extract()?;
            assert_eq!(processes, vec!["PhotoelectricEffect", "ComptonScattering"]);
            Ok(())
        })
        .unwrap();
    }
}
