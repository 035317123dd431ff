//! Python bindings.
//!
//! Inputs arriving from Python are validated here and rejected with
//! `ValueError`; the numeric core behind them assumes clean input.

use ndarray::Array1;
use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFloat};

use crate::coherence::{self, CoherenceResult, DifficultyBand};
use crate::engine::TriEngine;
use crate::error::TriError;
use crate::estimation;
use crate::items::{ensure_aligned, ItemParameters};
use crate::model::{self, icc_curve, logistic_3pl as p_3pl};
use crate::scoring::ScoreScale;
use crate::simulation;

impl From<TriError> for PyErr {
    fn from(err: TriError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Ability argument accepted by `logistic_3pl`: one value or a grid.
#[derive(FromPyObject)]
pub enum ThetaArg<'py> {
    Grid(PyReadonlyArray1<'py, f64>),
    Scalar(f64),
}

fn item_bank(
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
) -> PyResult<ItemParameters> {
    Ok(ItemParameters::new(
        a.as_array().to_vec(),
        b.as_array().to_vec(),
        c.as_array().to_vec(),
    )?)
}

fn checked_inputs(
    responses: PyReadonlyArray1<i32>,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
) -> PyResult<(Vec<i32>, ItemParameters)> {
    let items = item_bank(a, b, c)?;
    let responses = responses.as_array().to_vec();
    items.validate_responses(&responses)?;
    Ok((responses, items))
}

fn consistency_dict<'py>(
    py: Python<'py>,
    result: &CoherenceResult,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("total_correct", result.total_correct)?;
    dict.set_item("theta", result.theta)?;
    dict.set_item("coherence", result.coherence.as_str())?;
    Ok(dict)
}

fn band_dict<'py>(py: Python<'py>, band: &DifficultyBand) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("label", band.label.as_str())?;
    dict.set_item("lower", band.lower)?;
    dict.set_item("upper", band.upper)?;
    dict.set_item("correct", band.correct)?;
    dict.set_item("total", band.total)?;
    dict.set_item("hit_rate", band.hit_rate())?;
    Ok(dict)
}

fn curve<'py>(py: Python<'py>, theta: ThetaArg<'py>, a: f64, b: f64, c: f64) -> Bound<'py, PyAny> {
    match theta {
        ThetaArg::Scalar(t) => PyFloat::new(py, p_3pl(t, a, b, c)).into_any(),
        ThetaArg::Grid(grid) => {
            let grid = grid.as_array().to_vec();
            Array1::from_vec(icc_curve(&grid, a, b, c))
                .to_pyarray(py)
                .into_any()
        }
    }
}

/// 3PL probability of a correct response for a scalar or an array of abilities
#[pyfunction]
#[pyo3(signature = (theta, a, b, c))]
pub fn logistic_3pl<'py>(
    py: Python<'py>,
    theta: ThetaArg<'py>,
    a: f64,
    b: f64,
    c: f64,
) -> Bound<'py, PyAny> {
    curve(py, theta, a, b, c)
}

/// Probability of a correct response on every item at one ability
#[pyfunction]
pub fn item_probabilities<'py>(
    py: Python<'py>,
    theta: f64,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let items = item_bank(a, b, c)?;
    Ok(Array1::from_vec(TriEngine::default().item_probabilities(theta, &items)).to_pyarray(py))
}

/// Fisher information of every item at one ability
#[pyfunction]
pub fn item_information<'py>(
    py: Python<'py>,
    theta: f64,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let items = item_bank(a, b, c)?;
    Ok(Array1::from_vec(TriEngine::default().item_information(theta, &items)).to_pyarray(py))
}

/// Indices (easiest, closest to b = 0, hardest) of the items worth charting
#[pyfunction]
pub fn representative_items(b: PyReadonlyArray1<f64>) -> Option<(usize, usize, usize)> {
    let b = b.as_array().to_vec();
    model::representative_items(&b).map(|picks| (picks.easiest, picks.central, picks.hardest))
}

/// MAP ability estimate for one response pattern (0.0 if the search fails)
#[pyfunction]
pub fn estimate_theta(
    responses: PyReadonlyArray1<i32>,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
) -> PyResult<f64> {
    let (responses, items) = checked_inputs(responses, a, b, c)?;
    Ok(estimation::estimate_theta(&responses, &items.a, &items.b, &items.c))
}

/// MAP estimates and standard errors for every row of a persons x items matrix
#[pyfunction]
pub fn estimate_theta_batch<'py>(
    py: Python<'py>,
    responses: PyReadonlyArray2<i32>,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let items = item_bank(a, b, c)?;
    let responses = responses.as_array().to_owned();
    if responses.ncols() != items.len() {
        return Err(TriError::LengthMismatch {
            items: items.len(),
            responses: responses.ncols(),
        }
        .into());
    }
    for row in responses.rows() {
        items.validate_responses(&row.to_vec())?;
    }

    let estimates = py.detach(|| {
        estimation::estimate_theta_batch(responses.view(), &items.a, &items.b, &items.c)
    });

    let theta: Array1<f64> = estimates.iter().map(|e| e.theta).collect();
    let se: Array1<f64> = estimates.iter().map(|e| e.se).collect();
    Ok((theta.to_pyarray(py), se.to_pyarray(py)))
}

/// Convert ability to the ENEM reporting scale
#[pyfunction]
#[pyo3(signature = (theta, mean_scale=500.0, std_scale=100.0))]
pub fn to_enem_score(theta: f64, mean_scale: f64, std_scale: f64) -> f64 {
    ScoreScale::new(mean_scale, std_scale).to_score(theta)
}

/// Coherence of a response pattern given the estimated ability
#[pyfunction]
pub fn analyze_consistency<'py>(
    py: Python<'py>,
    theta: f64,
    responses: PyReadonlyArray1<i32>,
    b: PyReadonlyArray1<f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let responses = responses.as_array().to_vec();
    let b = b.as_array().to_vec();
    ensure_aligned(b.len(), responses.len())?;
    consistency_dict(py, &coherence::analyze_consistency(theta, &responses, &b))
}

/// Hit counts in five equal-width difficulty bands
#[pyfunction]
pub fn difficulty_profile<'py>(
    py: Python<'py>,
    responses: PyReadonlyArray1<i32>,
    b: PyReadonlyArray1<f64>,
) -> PyResult<Vec<Bound<'py, PyDict>>> {
    let responses = responses.as_array().to_vec();
    let b = b.as_array().to_vec();
    ensure_aligned(b.len(), responses.len())?;
    coherence::difficulty_profile(&responses, &b)
        .iter()
        .map(|band| band_dict(py, band))
        .collect()
}

/// Synthetic (a, b, c) arrays drawn from typical ENEM item distributions
#[pyfunction]
#[pyo3(signature = (n_items=180, seed=42))]
pub fn generate_item_parameters<'py>(
    py: Python<'py>,
    n_items: usize,
    seed: u64,
) -> (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>) {
    let items = ItemParameters::synthetic(n_items, seed);
    (
        Array1::from_vec(items.a).to_pyarray(py),
        Array1::from_vec(items.b).to_pyarray(py),
        Array1::from_vec(items.c).to_pyarray(py),
    )
}

/// Draw a response pattern from the 3PL model
#[pyfunction]
pub fn simulate_responses<'py>(
    py: Python<'py>,
    theta: f64,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    c: PyReadonlyArray1<f64>,
    seed: u64,
) -> PyResult<Bound<'py, PyArray1<i32>>> {
    let items = item_bank(a, b, c)?;
    Ok(Array1::from_vec(simulation::simulate_responses(theta, &items, seed)).to_pyarray(py))
}

/// 3PL engine with a fixed reporting scale
#[pyclass(name = "TRIEngine", frozen)]
pub struct PyTriEngine {
    inner: TriEngine,
}

#[pymethods]
impl PyTriEngine {
    #[new]
    #[pyo3(signature = (mean_scale=500.0, std_scale=100.0))]
    fn new(mean_scale: f64, std_scale: f64) -> Self {
        Self {
            inner: TriEngine::new(mean_scale, std_scale),
        }
    }

    #[getter]
    fn mean_scale(&self) -> f64 {
        self.inner.scale().mean_scale
    }

    #[getter]
    fn std_scale(&self) -> f64 {
        self.inner.scale().std_scale
    }

    fn logistic_3pl<'py>(
        &self,
        py: Python<'py>,
        theta: ThetaArg<'py>,
        a: f64,
        b: f64,
        c: f64,
    ) -> Bound<'py, PyAny> {
        curve(py, theta, a, b, c)
    }

    fn estimate_theta(
        &self,
        responses: PyReadonlyArray1<i32>,
        a: PyReadonlyArray1<f64>,
        b: PyReadonlyArray1<f64>,
        c: PyReadonlyArray1<f64>,
    ) -> PyResult<f64> {
        let (responses, items) = checked_inputs(responses, a, b, c)?;
        Ok(self.inner.estimate_theta(&responses, &items.a, &items.b, &items.c))
    }

    fn to_enem_score(&self, theta: f64) -> f64 {
        self.inner.to_enem_score(theta)
    }

    fn item_probabilities<'py>(
        &self,
        py: Python<'py>,
        theta: f64,
        a: PyReadonlyArray1<f64>,
        b: PyReadonlyArray1<f64>,
        c: PyReadonlyArray1<f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let items = item_bank(a, b, c)?;
        Ok(Array1::from_vec(self.inner.item_probabilities(theta, &items)).to_pyarray(py))
    }

    fn analyze_consistency<'py>(
        &self,
        py: Python<'py>,
        theta: f64,
        responses: PyReadonlyArray1<i32>,
        b: PyReadonlyArray1<f64>,
    ) -> PyResult<Bound<'py, PyDict>> {
        analyze_consistency(py, theta, responses, b)
    }

    fn __repr__(&self) -> String {
        format!(
            "TRIEngine(mean_scale={}, std_scale={})",
            self.mean_scale(),
            self.std_scale()
        )
    }
}

/// Register bindings with the Python module
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(logistic_3pl, m)?)?;
    m.add_function(wrap_pyfunction!(item_probabilities, m)?)?;
    m.add_function(wrap_pyfunction!(item_information, m)?)?;
    m.add_function(wrap_pyfunction!(representative_items, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_theta, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_theta_batch, m)?)?;
    m.add_function(wrap_pyfunction!(to_enem_score, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_consistency, m)?)?;
    m.add_function(wrap_pyfunction!(difficulty_profile, m)?)?;
    m.add_function(wrap_pyfunction!(generate_item_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_responses, m)?)?;
    m.add_class::<PyTriEngine>()?;
    Ok(())
}
