//! Pedagogical coherence of a response pattern.
//!
//! A pattern is flagged when the examinee misses most of the items that should
//! be easy for their estimated ability, i.e. items with `b < θ - 1`. This is a
//! heuristic, not a fit statistic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::round_to;

/// Items at least this far below θ count as easy.
pub const EASY_MARGIN: f64 = 1.0;
/// Accuracy on easy items below this is incoherent.
pub const EASY_ACCURACY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coherence {
    High,
    Low,
}

impl Coherence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coherence::High => "High",
            Coherence::Low => "Low",
        }
    }
}

impl fmt::Display for Coherence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherenceResult {
    pub total_correct: usize,
    /// θ rounded to 4 decimal places.
    pub theta: f64,
    pub coherence: Coherence,
}

pub fn analyze_consistency(theta: f64, responses: &[i32], b: &[f64]) -> CoherenceResult {
    let total_correct = responses.iter().filter(|&&r| r == 1).count();
    let coherence = if is_coherent(theta, responses, b) {
        Coherence::High
    } else {
        Coherence::Low
    };
    CoherenceResult {
        total_correct,
        theta: round_to(theta, 4),
        coherence,
    }
}

/// `false` only when a non-empty easy subset has accuracy below the threshold.
pub fn is_coherent(theta: f64, responses: &[i32], b: &[f64]) -> bool {
    let cutoff = theta - EASY_MARGIN;
    let (correct, easy) = responses
        .iter()
        .zip(b)
        .filter(|&(_, &b_j)| b_j < cutoff)
        .fold((0usize, 0usize), |(hits, n), (&r, _)| (hits + (r == 1) as usize, n + 1));

    if easy == 0 {
        return true;
    }
    (correct as f64 / easy as f64) >= EASY_ACCURACY_THRESHOLD
}

/// Item indices from easiest to hardest. Equal difficulties keep input order.
pub fn difficulty_order(b: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..b.len()).collect();
    order.sort_by(|&i, &j| b[i].partial_cmp(&b[j]).unwrap_or(std::cmp::Ordering::Equal));
    order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandLabel {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl BandLabel {
    pub const ALL: [BandLabel; 5] = [
        BandLabel::VeryEasy,
        BandLabel::Easy,
        BandLabel::Medium,
        BandLabel::Hard,
        BandLabel::VeryHard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BandLabel::VeryEasy => "Very easy",
            BandLabel::Easy => "Easy",
            BandLabel::Medium => "Medium",
            BandLabel::Hard => "Hard",
            BandLabel::VeryHard => "Very hard",
        }
    }
}

/// Hits within one slice of the difficulty range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyBand {
    pub label: BandLabel,
    pub lower: f64,
    pub upper: f64,
    pub correct: usize,
    pub total: usize,
}

impl DifficultyBand {
    pub fn hit_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }
}

/// Split `[min b, max b]` into five equal-width bands and count hits per band.
///
/// Bands are right-closed and the first band also includes the lowest edge.
pub fn difficulty_profile(responses: &[i32], b: &[f64]) -> Vec<DifficultyBand> {
    if b.is_empty() {
        return Vec::new();
    }
    let lo = b.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = b.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let n_bands = BandLabel::ALL.len();
    let width = (hi - lo) / n_bands as f64;
    let edge = |k: usize| if k == n_bands { hi } else { lo + width * k as f64 };

    let mut bands: Vec<DifficultyBand> = BandLabel::ALL
        .iter()
        .enumerate()
        .map(|(k, &label)| DifficultyBand {
            label,
            lower: edge(k),
            upper: edge(k + 1),
            correct: 0,
            total: 0,
        })
        .collect();

    for (&r, &b_j) in responses.iter().zip(b) {
        let k = (0..n_bands)
            .find(|&k| b_j <= bands[k].upper)
            .unwrap_or(n_bands - 1);
        bands[k].total += 1;
        if r == 1 {
            bands[k].correct += 1;
        }
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const B: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];

    #[test]
    fn misses_above_ability_are_coherent() {
        let result = analyze_consistency(0.287_556, &[1, 1, 1, 0, 0], &B);
        assert_eq!(result.total_correct, 3);
        assert_eq!(result.coherence, Coherence::High);
        assert_relative_eq!(result.theta, 0.2876, epsilon = 1e-12);
    }

    #[test]
    fn missing_easy_items_is_incoherent() {
        let result = analyze_consistency(0.5, &[0, 0, 1, 1, 1], &B);
        assert_eq!(result.coherence, Coherence::Low);
        assert_eq!(result.total_correct, 3);
    }

    #[test]
    fn empty_easy_subset_defaults_high() {
        assert!(is_coherent(-1.5, &[0, 0, 0, 0, 0], &B));
        assert_eq!(analyze_consistency(-5.0, &[], &[]).coherence, Coherence::High);
    }

    #[test]
    fn easy_subset_uses_strict_margin() {
        // b = -1 sits exactly on θ - 1 and is not easy.
        assert!(is_coherent(0.0, &[1, 0, 1, 1, 1], &B));
        assert!(!is_coherent(0.0, &[0, 0, 1, 1, 1], &B));
    }

    #[test]
    fn half_accuracy_is_still_coherent() {
        // Easy subset for θ = 0.5: b = -2, -1. One hit out of two.
        assert!(is_coherent(0.5, &[1, 0, 0, 0, 0], &B));
        assert!(is_coherent(0.5, &[0, 1, 0, 0, 0], &B));
    }

    #[test]
    fn label_ignores_item_order() {
        let b = [1.0, -2.0, 2.0, -1.0, 0.0];
        let r = [1, 0, 1, 0, 1];
        let order = difficulty_order(&b);
        assert_eq!(order, vec![1, 3, 4, 0, 2]);
        let sorted_b: Vec<f64> = order.iter().map(|&j| b[j]).collect();
        let sorted_r: Vec<i32> = order.iter().map(|&j| r[j]).collect();
        assert_eq!(
            analyze_consistency(0.5, &r, &b),
            analyze_consistency(0.5, &sorted_r, &sorted_b)
        );
    }

    #[test]
    fn profile_splits_range_into_five_bands() {
        let b = [-3.0, -2.0, -1.0, 0.0, 0.2, 1.0, 3.0, 2.9];
        let r = [1, 1, 1, 0, 1, 0, 0, 1];
        let profile = difficulty_profile(&r, &b);
        assert_eq!(profile.len(), 5);
        assert_eq!(profile[0].label, BandLabel::VeryEasy);
        assert_relative_eq!(profile[0].lower, -3.0);
        assert_relative_eq!(profile[4].upper, 3.0);

        let totals: Vec<usize> = profile.iter().map(|band| band.total).collect();
        assert_eq!(totals, vec![2, 1, 2, 1, 2]);
        assert_eq!(profile[0].hit_rate(), Some(1.0));
        assert_eq!(profile[4].hit_rate(), Some(0.5));
    }

    #[test]
    fn flat_difficulties_fill_the_first_band() {
        let profile = difficulty_profile(&[1, 0, 1], &[0.5, 0.5, 0.5]);
        assert_eq!(profile[0].total, 3);
        assert!(profile[1..].iter().all(|band| band.hit_rate().is_none()));
        assert!(difficulty_profile(&[], &[]).is_empty());
    }
}
