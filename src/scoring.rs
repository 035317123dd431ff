//! Affine mapping from the ability scale to the reporting scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reporting scale, `score = mean_scale + std_scale * θ`.
///
/// Defaults to the ENEM convention of mean 500 and standard deviation 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreScale {
    pub mean_scale: f64,
    pub std_scale: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self {
            mean_scale: 500.0,
            std_scale: 100.0,
        }
    }
}

impl ScoreScale {
    pub fn new(mean_scale: f64, std_scale: f64) -> Self {
        Self {
            mean_scale,
            std_scale,
        }
    }

    #[inline]
    pub fn to_score(&self, theta: f64) -> f64 {
        self.mean_scale + self.std_scale * theta
    }

    /// Inverse of [`ScoreScale::to_score`]. Meaningless when `std_scale == 0`.
    #[inline]
    pub fn to_theta(&self, score: f64) -> f64 {
        (score - self.mean_scale) / self.std_scale
    }

    /// Band of a score already expressed on this scale.
    pub fn band(&self, score: f64) -> PerformanceBand {
        PerformanceBand::from_score(score)
    }
}

/// [`ScoreScale::to_score`] on the default scale.
pub fn to_enem_score(theta: f64) -> f64 {
    ScoreScale::default().to_score(theta)
}

/// Coarse grouping of reported scores used for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceBand {
    /// 900 and above.
    Excellent,
    /// 800 up to 900.
    Advanced,
    Developing,
}

impl PerformanceBand {
    pub const EXCELLENT_FROM: f64 = 900.0;
    pub const ADVANCED_FROM: f64 = 800.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_FROM {
            PerformanceBand::Excellent
        } else if score >= Self::ADVANCED_FROM {
            PerformanceBand::Advanced
        } else {
            PerformanceBand::Developing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::Advanced => "Advanced",
            PerformanceBand::Developing => "Developing",
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_ability_maps_to_the_mean() {
        assert_relative_eq!(to_enem_score(0.0), 500.0);
        assert_relative_eq!(ScoreScale::new(250.0, 50.0).to_score(0.0), 250.0);
    }

    #[test]
    fn mapping_is_linear() {
        let scale = ScoreScale::default();
        let (t1, t2) = (-1.3, 2.1);
        let mid = scale.to_score(0.5 * (t1 + t2));
        assert_relative_eq!(mid, 0.5 * (scale.to_score(t1) + scale.to_score(t2)), epsilon = 1e-9);
        assert_relative_eq!(scale.to_score(1.0) - scale.to_score(0.0), 100.0);
        assert_relative_eq!(scale.to_theta(scale.to_score(t1)), t1, epsilon = 1e-12);
    }

    #[test]
    fn bands_follow_score_thresholds() {
        assert_eq!(PerformanceBand::from_score(950.0), PerformanceBand::Excellent);
        assert_eq!(PerformanceBand::from_score(900.0), PerformanceBand::Excellent);
        assert_eq!(PerformanceBand::from_score(899.9), PerformanceBand::Advanced);
        assert_eq!(PerformanceBand::from_score(800.0), PerformanceBand::Advanced);
        assert_eq!(PerformanceBand::from_score(528.8), PerformanceBand::Developing);
        assert_eq!(PerformanceBand::Advanced.to_string(), "Advanced");
    }
}
