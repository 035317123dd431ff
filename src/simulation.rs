//! Example response patterns for demonstrations and tests.

use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::items::ItemParameters;
use crate::model::logistic_3pl;

/// Draw a pattern from the 3PL model for an examinee of ability `theta`.
pub fn simulate_responses(theta: f64, items: &ItemParameters, seed: u64) -> Vec<i32> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..items.len())
        .map(|j| {
            let p = logistic_3pl(theta, items.a[j], items.b[j], items.c[j]);
            if rng.random::<f64>() < p { 1 } else { 0 }
        })
        .collect()
}

/// Coin-flip pattern, the signature of an examinee guessing throughout.
pub fn random_responses(n_items: usize, seed: u64) -> Vec<i32> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..n_items).map(|_| rng.random_range(0..2)).collect()
}
