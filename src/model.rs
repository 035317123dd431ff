//! Three-parameter logistic (3PL) item response model.
//!
//! `P(θ) = c + (1 - c) / (1 + exp(-a (θ - b)))`
//!
//! No validation happens here. `a = 0` is tolerated and yields the constant
//! curve `(1 + c) / 2`.

use crate::utils::sigmoid;

/// Probability of a correct response to one item.
#[inline]
pub fn logistic_3pl(theta: f64, a: f64, b: f64, c: f64) -> f64 {
    c + (1.0 - c) * sigmoid(a * (theta - b))
}

/// Probability of a correct response for every item at a single ability.
pub fn logistic_3pl_items(theta: f64, a: &[f64], b: &[f64], c: &[f64]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .zip(c)
        .map(|((&a_j, &b_j), &c_j)| logistic_3pl(theta, a_j, b_j, c_j))
        .collect()
}

/// Item characteristic curve over a grid of abilities.
pub fn icc_curve(thetas: &[f64], a: f64, b: f64, c: f64) -> Vec<f64> {
    thetas
        .iter()
        .map(|&theta| logistic_3pl(theta, a, b, c))
        .collect()
}

/// First derivative of the 3PL curve with respect to θ.
#[inline]
pub fn item_slope(theta: f64, a: f64, b: f64, c: f64) -> f64 {
    let p_star = sigmoid(a * (theta - b));
    a * (1.0 - c) * p_star * (1.0 - p_star)
}

/// Fisher information of one 3PL item at θ.
#[inline]
pub fn item_information(theta: f64, a: f64, b: f64, c: f64) -> f64 {
    let p = logistic_3pl(theta, a, b, c);
    if p <= 0.0 {
        return 0.0;
    }
    let slope = item_slope(theta, a, b, c);
    slope * slope / (p * (1.0 - p)).max(f64::MIN_POSITIVE)
}

/// Items worth drawing when charting curves for a test form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentativeItems {
    pub easiest: usize,
    pub central: usize,
    pub hardest: usize,
}

/// Pick the easiest item, the item closest to `b = 0` and the hardest item.
///
/// Ties resolve to the lowest index.
pub fn representative_items(b: &[f64]) -> Option<RepresentativeItems> {
    if b.is_empty() {
        return None;
    }
    let mut easiest = 0;
    let mut central = 0;
    let mut hardest = 0;
    for (j, &b_j) in b.iter().enumerate() {
        if b_j < b[easiest] {
            easiest = j;
        }
        if b_j > b[hardest] {
            hardest = j;
        }
        if b_j.abs() < b[central].abs() {
            central = j;
        }
    }
    Some(RepresentativeItems {
        easiest,
        central,
        hardest,
    })
}
