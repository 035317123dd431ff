//! Log-posterior of ability under the 3PL likelihood and a standard normal prior.

use crate::model::logistic_3pl;
use crate::utils::clip_probability;

/// Response log-likelihood `Σ r ln P + (1 - r) ln(1 - P)` with clipped `P`.
pub fn log_likelihood(theta: f64, responses: &[i32], a: &[f64], b: &[f64], c: &[f64]) -> f64 {
    let mut ll = 0.0;
    for (j, &resp) in responses.iter().enumerate() {
        let p = clip_probability(logistic_3pl(theta, a[j], b[j], c[j]));
        let r = resp as f64;
        ll += r * p.ln() + (1.0 - r) * (1.0 - p).ln();
    }
    ll
}

/// Unnormalised log-prior of a standard normal.
#[inline]
pub fn log_prior(theta: f64) -> f64 {
    -0.5 * theta * theta
}

/// Objective maximised by the MAP estimator.
pub fn log_posterior(theta: f64, responses: &[i32], a: &[f64], b: &[f64], c: &[f64]) -> f64 {
    log_likelihood(theta, responses, a, b, c) + log_prior(theta)
}

/// Gradient of [`log_posterior`] and its expected information (prior included).
///
/// Per item the score is `a (r - P)(P - c) / (P (1 - c))` and the information
/// is `a² (P - c)² (1 - P) / ((1 - c)² P)`. The prior adds `-θ` and `1`.
pub fn score_and_information(
    theta: f64,
    responses: &[i32],
    a: &[f64],
    b: &[f64],
    c: &[f64],
) -> (f64, f64) {
    let mut grad = -theta;
    let mut info = 1.0;
    for (j, &resp) in responses.iter().enumerate() {
        let (a_j, c_j) = (a[j], c[j]);
        let p = clip_probability(logistic_3pl(theta, a_j, b[j], c_j));
        let lift = p - c_j;
        let one_minus_c = 1.0 - c_j;

        grad += a_j * (resp as f64 - p) * lift / (p * one_minus_c);
        info += a_j * a_j * lift * lift * (1.0 - p) / (one_minus_c * one_minus_c * p);
    }
    (grad, info)
}

/// Observed second derivative of [`log_posterior`], prior included.
///
/// Per item this is `a² (P - c)(1 - P) / (1 - c)² · (-(P - c)/P + (r - P) c / P²)`.
/// It is negative for every incorrect response but can turn positive for a
/// correct response on an item with a guessing floor.
pub fn observed_curvature(
    theta: f64,
    responses: &[i32],
    a: &[f64],
    b: &[f64],
    c: &[f64],
) -> f64 {
    let mut hess = -1.0;
    for (j, &resp) in responses.iter().enumerate() {
        let (a_j, c_j) = (a[j], c[j]);
        let p = clip_probability(logistic_3pl(theta, a_j, b[j], c_j));
        let lift = p - c_j;
        let one_minus_c = 1.0 - c_j;
        let bracket = -lift / p + (resp as f64 - p) * c_j / (p * p);

        hess += a_j * a_j * lift * (1.0 - p) / (one_minus_c * one_minus_c) * bracket;
    }
    hess
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const A: [f64; 5] = [1.5, 1.2, 1.8, 1.0, 2.0];
    const B: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];
    const C: [f64; 5] = [0.2; 5];

    #[test]
    fn prior_pulls_toward_zero() {
        assert_relative_eq!(log_prior(0.0), 0.0);
        assert_relative_eq!(log_prior(2.0), -2.0);
        assert_relative_eq!(log_prior(-2.0), log_prior(2.0));
    }

    #[test]
    fn posterior_is_likelihood_plus_prior() {
        let r = [1, 1, 1, 0, 0];
        let theta = 0.7;
        assert_relative_eq!(
            log_posterior(theta, &r, &A, &B, &C),
            log_likelihood(theta, &r, &A, &B, &C) - 0.245,
            epsilon = 1e-12
        );
    }

    #[test]
    fn certain_responses_stay_finite() {
        let r = [0];
        let ll = log_likelihood(500.0, &r, &[3.0], &[-3.0], &[0.0]);
        assert!(ll.is_finite());
        assert_relative_eq!(ll, (1e-10f64).ln(), epsilon = 1e-6);
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let r = [0, 1, 1, 0, 1];
        let h = 1e-6;
        for theta in [-1.5, -0.2, 0.0, 0.9, 2.2] {
            let numeric = (log_posterior(theta + h, &r, &A, &B, &C)
                - log_posterior(theta - h, &r, &A, &B, &C))
                / (2.0 * h);
            let (grad, info) = score_and_information(theta, &r, &A, &B, &C);
            assert_relative_eq!(grad, numeric, epsilon = 1e-6);
            assert!(info >= 1.0);
        }
    }

    #[test]
    fn curvature_matches_finite_difference_of_gradient() {
        let r = [1, 0, 1, 1, 0];
        let h = 1e-5;
        for theta in [-1.0, 0.0, 1.3] {
            let numeric = (score_and_information(theta + h, &r, &A, &B, &C).0
                - score_and_information(theta - h, &r, &A, &B, &C).0)
                / (2.0 * h);
            assert_relative_eq!(observed_curvature(theta, &r, &A, &B, &C), numeric, epsilon = 1e-7);
        }
    }

    #[test]
    fn incorrect_responses_are_always_concave() {
        for theta in [-4.0, -1.0, 0.0, 2.5] {
            assert!(observed_curvature(theta, &[0; 5], &A, &B, &C) < -1.0);
        }
    }

    #[test]
    fn zero_discrimination_contributes_nothing_to_the_gradient() {
        let (grad, info) = score_and_information(0.4, &[1], &[0.0], &[1.0], &[0.2]);
        assert_relative_eq!(grad, -0.4, epsilon = 1e-12);
        assert_relative_eq!(info, 1.0, epsilon = 1e-12);
    }
}
