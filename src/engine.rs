//! Facade bundling the score scale and the estimator settings.

use serde::{Deserialize, Serialize};

use crate::coherence::{analyze_consistency, difficulty_profile, CoherenceResult, DifficultyBand};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::estimation::MapEstimator;
use crate::items::ItemParameters;
use crate::model::{item_information, logistic_3pl, logistic_3pl_items};
use crate::scoring::{PerformanceBand, ScoreScale};

/// Holds only configuration; every method is a pure function of its inputs,
/// so one engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriEngine {
    scale: ScoreScale,
    estimator: MapEstimator,
}

/// Full analysis of one response pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub theta: f64,
    pub se: f64,
    pub converged: bool,
    pub score: f64,
    pub band: PerformanceBand,
    pub consistency: CoherenceResult,
    pub profile: Vec<DifficultyBand>,
}

impl TriEngine {
    pub fn new(mean_scale: f64, std_scale: f64) -> Self {
        Self {
            scale: ScoreScale::new(mean_scale, std_scale),
            estimator: MapEstimator::default(),
        }
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            scale: config.scale,
            estimator: MapEstimator::new(config.estimator),
        }
    }

    pub fn scale(&self) -> &ScoreScale {
        &self.scale
    }

    pub fn estimator(&self) -> &MapEstimator {
        &self.estimator
    }

    pub fn logistic_3pl(&self, theta: f64, a: f64, b: f64, c: f64) -> f64 {
        logistic_3pl(theta, a, b, c)
    }

    /// Correct-response probability of every item in the bank at `theta`.
    pub fn item_probabilities(&self, theta: f64, items: &ItemParameters) -> Vec<f64> {
        logistic_3pl_items(theta, &items.a, &items.b, &items.c)
    }

    pub fn item_information(&self, theta: f64, items: &ItemParameters) -> Vec<f64> {
        (0..items.len())
            .map(|j| item_information(theta, items.a[j], items.b[j], items.c[j]))
            .collect()
    }

    /// MAP ability, `0.0` when the search does not converge.
    pub fn estimate_theta(&self, responses: &[i32], a: &[f64], b: &[f64], c: &[f64]) -> f64 {
        self.estimator.estimate(responses, a, b, c).theta
    }

    pub fn to_enem_score(&self, theta: f64) -> f64 {
        self.scale.to_score(theta)
    }

    pub fn analyze_consistency(&self, theta: f64, responses: &[i32], b: &[f64]) -> CoherenceResult {
        analyze_consistency(theta, responses, b)
    }

    /// Validate the inputs, then estimate, score and analyse in one pass.
    pub fn evaluate(&self, responses: &[i32], items: &ItemParameters) -> Result<Evaluation> {
        items.validate()?;
        items.validate_responses(responses)?;

        let estimate = self.estimator.estimate(responses, &items.a, &items.b, &items.c);
        let score = self.scale.to_score(estimate.theta);
        Ok(Evaluation {
            theta: estimate.theta,
            se: estimate.se,
            converged: estimate.converged,
            score,
            band: self.scale.band(score),
            consistency: analyze_consistency(estimate.theta, responses, &items.b),
            profile: difficulty_profile(responses, &items.b),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coherence::Coherence;
    use crate::error::TriError;
    use approx::assert_relative_eq;

    fn five_items() -> ItemParameters {
        ItemParameters::new(
            vec![1.5, 1.2, 1.8, 1.0, 2.0],
            vec![-2.0, -1.0, 0.0, 1.0, 2.0],
            vec![0.2; 5],
        )
        .unwrap()
    }

    #[test]
    fn custom_scale_changes_only_the_score() {
        let items = five_items();
        let r = [1, 1, 1, 0, 0];
        let default = TriEngine::default().evaluate(&r, &items).unwrap();
        let custom = TriEngine::new(250.0, 50.0).evaluate(&r, &items).unwrap();
        assert_eq!(default.theta, custom.theta);
        assert_relative_eq!(custom.score - 250.0, (default.score - 500.0) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn evaluation_reports_every_part() {
        let eval = TriEngine::default().evaluate(&[0, 0, 1, 1, 1], &five_items()).unwrap();
        assert!(eval.converged);
        assert!(eval.theta < 0.0);
        assert_eq!(eval.band, PerformanceBand::Developing);
        assert_eq!(eval.consistency.coherence, Coherence::Low);
        assert_eq!(eval.profile.iter().map(|band| band.total).sum::<usize>(), 5);
    }

    #[test]
    fn item_curves_follow_the_bank() {
        let engine = TriEngine::default();
        let items = five_items();
        let probs = engine.item_probabilities(0.0, &items);
        assert_eq!(probs.len(), 5);
        assert_relative_eq!(probs[2], 0.6, epsilon = 1e-12);
        assert!(probs.windows(2).all(|w| w[0] > w[1]));

        let info = engine.item_information(0.0, &items);
        assert_eq!(info.len(), 5);
        let most_informative = (0..5).max_by(|&i, &j| info[i].total_cmp(&info[j]));
        assert_eq!(most_informative, Some(2));
    }

    #[test]
    fn evaluate_rejects_misaligned_input() {
        let err = TriEngine::default().evaluate(&[1, 0], &five_items()).unwrap_err();
        assert!(matches!(err, TriError::LengthMismatch { .. }));
    }

    #[test]
    fn config_drives_the_estimator() {
        let config = EngineConfig::from_toml_str("[estimator]\nmax_iter = 1\n").unwrap();
        let engine = TriEngine::from_config(config);
        let items = five_items();
        assert_eq!(engine.estimate_theta(&[1; 5], &items.a, &items.b, &items.c), 0.0);
    }
}
