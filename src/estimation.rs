//! Maximum a posteriori (MAP) ability estimation.
//!
//! Newton-Raphson on the log-posterior from `θ = 0`. The observed curvature is
//! used while it is negative; otherwise the step falls back to Fisher scoring.
//! Steps are clamped to `max_step` and halved until the objective stops
//! decreasing. When the
//! iteration fails (non-finite values, halving exhausted, iteration cap) the
//! estimate falls back to `θ = 0.0` and is marked as not converged.

use ndarray::ArrayView2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::posterior::{log_posterior, observed_curvature, score_and_information};
use crate::utils::clip;

/// Starting point of the search and the fallback value on failure.
pub const INITIAL_THETA: f64 = 0.0;

/// Tuning knobs for the MAP search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub max_iter: usize,
    /// Converged once the accepted step is smaller than this.
    pub tol: f64,
    pub max_step: f64,
    pub max_halvings: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-8,
            max_step: 2.0,
            max_halvings: 30,
        }
    }
}

/// Result of one MAP search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapEstimate {
    pub theta: f64,
    /// `1 / sqrt(information)` at `theta`, prior precision included.
    pub se: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MapEstimator {
    config: EstimatorConfig,
}

impl MapEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn estimate(&self, responses: &[i32], a: &[f64], b: &[f64], c: &[f64]) -> MapEstimate {
        let cfg = &self.config;
        let mut theta = INITIAL_THETA;
        let mut current = log_posterior(theta, responses, a, b, c);
        if !current.is_finite() {
            return self.fallback(responses, a, b, c, 0, "non-finite objective at start");
        }

        for iter in 1..=cfg.max_iter {
            let (grad, info) = score_and_information(theta, responses, a, b, c);
            let hess = observed_curvature(theta, responses, a, b, c);
            if !grad.is_finite() || !info.is_finite() || !hess.is_finite() || info <= 0.0 {
                return self.fallback(responses, a, b, c, iter, "non-finite gradient");
            }

            let curvature = if hess < 0.0 { -hess } else { info };
            let mut step = clip(grad / curvature, -cfg.max_step, cfg.max_step);
            let mut accepted = None;
            for _ in 0..=cfg.max_halvings {
                let candidate = log_posterior(theta + step, responses, a, b, c);
                if candidate.is_finite() && candidate >= current {
                    accepted = Some(candidate);
                    break;
                }
                step *= 0.5;
            }
            let Some(value) = accepted else {
                return self.fallback(responses, a, b, c, iter, "step halving exhausted");
            };

            theta += step;
            current = value;

            if step.abs() < cfg.tol {
                let (_, info) = score_and_information(theta, responses, a, b, c);
                tracing::debug!(theta, iterations = iter, "MAP estimate converged");
                return MapEstimate {
                    theta,
                    se: 1.0 / info.sqrt(),
                    iterations: iter,
                    converged: true,
                };
            }
        }

        self.fallback(responses, a, b, c, cfg.max_iter, "iteration cap reached")
    }

    /// Estimate every row of a persons × items response matrix in parallel.
    pub fn estimate_batch(
        &self,
        responses: ArrayView2<i32>,
        a: &[f64],
        b: &[f64],
        c: &[f64],
    ) -> Vec<MapEstimate> {
        (0..responses.nrows())
            .into_par_iter()
            .map(|i| {
                let row: Vec<i32> = responses.row(i).to_vec();
                self.estimate(&row, a, b, c)
            })
            .collect()
    }

    fn fallback(
        &self,
        responses: &[i32],
        a: &[f64],
        b: &[f64],
        c: &[f64],
        iterations: usize,
        reason: &str,
    ) -> MapEstimate {
        tracing::warn!(
            reason,
            iterations,
            "MAP search did not converge, falling back to theta = {INITIAL_THETA}"
        );
        let (_, info) = score_and_information(INITIAL_THETA, responses, a, b, c);
        let se = if info.is_finite() && info > 0.0 {
            1.0 / info.sqrt()
        } else {
            f64::INFINITY
        };
        MapEstimate {
            theta: INITIAL_THETA,
            se,
            iterations,
            converged: false,
        }
    }
}

/// MAP ability with default settings; `0.0` when the search fails.
pub fn estimate_theta(responses: &[i32], a: &[f64], b: &[f64], c: &[f64]) -> f64 {
    MapEstimator::default().estimate(responses, a, b, c).theta
}

/// [`estimate_theta`] for many examinees sharing one item bank.
pub fn estimate_theta_batch(
    responses: ArrayView2<i32>,
    a: &[f64],
    b: &[f64],
    c: &[f64],
) -> Vec<MapEstimate> {
    MapEstimator::default().estimate_batch(responses, a, b, c)
}
