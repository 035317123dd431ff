//! Numeric helpers shared by the probability model and the estimator.

/// Probabilities are clipped to `[PROB_EPSILON, 1 - PROB_EPSILON]` before logs.
pub const PROB_EPSILON: f64 = 1e-10;

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp_x = x.exp();
        exp_x / (1.0 + exp_x)
    }
}

#[inline]
pub fn clip(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

#[inline]
pub fn clip_probability(p: f64) -> f64 {
    clip(p, PROB_EPSILON, 1.0 - PROB_EPSILON)
}

/// Round half away from zero to `decimals` places.
#[inline]
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_is_symmetric_and_stable() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5);
        assert_abs_diff_eq!(sigmoid(3.0) + sigmoid(-3.0), 1.0, epsilon = 1e-15);
        assert!(sigmoid(-800.0) >= 0.0);
        assert_abs_diff_eq!(sigmoid(800.0), 1.0);
    }

    #[test]
    fn clip_probability_bounds() {
        assert_abs_diff_eq!(clip_probability(0.0), PROB_EPSILON);
        assert_abs_diff_eq!(clip_probability(1.0), 1.0 - PROB_EPSILON);
        assert_abs_diff_eq!(clip_probability(0.3), 0.3);
    }

    #[test]
    fn round_to_four_places() {
        assert_abs_diff_eq!(round_to(0.287_555_9, 4), 0.2876, epsilon = 1e-12);
        assert_abs_diff_eq!(round_to(-0.967_014_3, 4), -0.967, epsilon = 1e-12);
    }
}
