//! Three-parameter logistic (3PL) Item Response Theory scoring engine.
//!
//! This crate estimates an examinee's ability from a binary response pattern
//! against items with known parameters and reports it on an ENEM-style scale:
//! - 3PL response probabilities and item characteristic curves
//! - Log-posterior under a standard normal prior on ability
//! - MAP ability estimation (Newton-Raphson), single and batched
//! - Affine score mapping (mean 500, SD 100 by default)
//! - Response-pattern coherence and hit rates by difficulty band
//! - Item bank validation, column aliases and synthetic banks
//!
//! Python bindings are available with the `python` feature.

pub mod utils;

pub mod coherence;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimation;
pub mod items;
pub mod model;
pub mod posterior;
pub mod scoring;
pub mod simulation;

#[cfg(feature = "python")]
pub mod python;

pub use coherence::{analyze_consistency, Coherence, CoherenceResult};
pub use config::EngineConfig;
pub use engine::{Evaluation, TriEngine};
pub use error::TriError;
pub use estimation::{estimate_theta, EstimatorConfig, MapEstimate, MapEstimator};
pub use items::ItemParameters;
pub use model::logistic_3pl;
pub use scoring::{to_enem_score, PerformanceBand, ScoreScale};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module for tri_rs
#[cfg(feature = "python")]
#[pymodule]
fn tri_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register(m)?;
    Ok(())
}
