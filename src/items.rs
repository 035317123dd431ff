//! Item parameter bank stored as parallel `a`, `b`, `c` arrays.
//!
//! Also holds the helpers used where item tables enter the crate: header
//! normalisation, validation, and synthetic banks for when no calibrated
//! parameters are available.

use rand::prelude::*;
use rand_distr::StandardNormal;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriError};
use crate::utils::clip;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemParameters {
    /// Discrimination.
    pub a: Vec<f64>,
    /// Difficulty.
    pub b: Vec<f64>,
    /// Guessing floor.
    pub c: Vec<f64>,
}

/// One of the three parameter columns of an item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamColumn {
    A,
    B,
    C,
}

impl ParamColumn {
    /// Recognise short names and their long aliases, ignoring case and padding.
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_lowercase().as_str() {
            "a" | "discrimination" | "discriminacao" | "discriminação" => Some(ParamColumn::A),
            "b" | "difficulty" | "dificuldade" => Some(ParamColumn::B),
            "c" | "guessing" | "acerto_casual" => Some(ParamColumn::C),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParamColumn::A => "a",
            ParamColumn::B => "b",
            ParamColumn::C => "c",
        }
    }
}

impl ItemParameters {
    pub fn new(a: Vec<f64>, b: Vec<f64>, c: Vec<f64>) -> Result<Self> {
        let items = Self { a, b, c };
        items.validate()?;
        Ok(items)
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Build a bank from a parsed table, picking columns by (aliased) header.
    ///
    /// Extra columns such as `item_id` are ignored. When a column name appears
    /// twice the first occurrence wins.
    pub fn from_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<f64>]) -> Result<Self> {
        let mut index = [None; 3];
        for (pos, header) in headers.iter().enumerate() {
            let slot = match ParamColumn::from_header(header.as_ref()) {
                Some(ParamColumn::A) => 0,
                Some(ParamColumn::B) => 1,
                Some(ParamColumn::C) => 2,
                None => continue,
            };
            index[slot].get_or_insert(pos);
        }
        let [Some(ia), Some(ib), Some(ic)] = index else {
            let missing = [ParamColumn::A, ParamColumn::B, ParamColumn::C]
                .into_iter()
                .zip(index)
                .find(|(_, pos)| pos.is_none())
                .map(|(col, _)| col.name())
                .unwrap_or("a");
            return Err(TriError::MissingColumn(missing));
        };

        let mut items = Self {
            a: Vec::with_capacity(rows.len()),
            b: Vec::with_capacity(rows.len()),
            c: Vec::with_capacity(rows.len()),
        };
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(TriError::RowWidth {
                    row: row_idx,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            items.a.push(row[ia]);
            items.b.push(row[ib]);
            items.c.push(row[ic]);
        }
        items.validate()?;
        Ok(items)
    }

    /// Parallel lengths, finite values and `c` in `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.a.len() != self.b.len() || self.a.len() != self.c.len() {
            return Err(TriError::RaggedParameters {
                a: self.a.len(),
                b: self.b.len(),
                c: self.c.len(),
            });
        }
        for j in 0..self.len() {
            if !(self.a[j].is_finite() && self.b[j].is_finite() && self.c[j].is_finite()) {
                return Err(TriError::NonFiniteParameter { index: j });
            }
            if !(0.0..1.0).contains(&self.c[j]) {
                return Err(TriError::InvalidGuessing {
                    index: j,
                    value: self.c[j],
                });
            }
        }
        Ok(())
    }

    /// Responses must align with the bank and be 0 or 1.
    pub fn validate_responses(&self, responses: &[i32]) -> Result<()> {
        ensure_aligned(self.len(), responses.len())?;
        if let Some((index, &value)) = responses
            .iter()
            .enumerate()
            .find(|(_, &r)| r != 0 && r != 1)
        {
            return Err(TriError::NonBinaryResponse { index, value });
        }
        Ok(())
    }

    /// Bank drawn from distributions typical of calibrated ENEM items.
    ///
    /// `a ~ N(1.4, 0.4)` clipped to `[0.5, 3]`, `b ~ N(0, 1.2)` clipped to
    /// `[-3, 3]`, `c ~ U(0.15, 0.25)`.
    pub fn synthetic(n_items: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut items = Self::default();
        for _ in 0..n_items {
            let z_a: f64 = rng.sample(StandardNormal);
            items.a.push(clip(1.4 + 0.4 * z_a, 0.5, 3.0));
        }
        for _ in 0..n_items {
            let z_b: f64 = rng.sample(StandardNormal);
            items.b.push(clip(1.2 * z_b, -3.0, 3.0));
        }
        for _ in 0..n_items {
            items.c.push(rng.random_range(0.15..0.25));
        }
        items
    }

    /// Bank with difficulties evenly spread over `[-3, 3]`.
    ///
    /// `a ~ U(0.8, 2.5)` and `c ~ U(0.15, 0.25)`.
    pub fn spread(n_items: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let a = (0..n_items).map(|_| rng.random_range(0.8..2.5)).collect();
        let b = match n_items {
            0 => Vec::new(),
            1 => vec![-3.0],
            n => (0..n)
                .map(|j| -3.0 + 6.0 * j as f64 / (n - 1) as f64)
                .collect(),
        };
        let c = (0..n_items).map(|_| rng.random_range(0.15..0.25)).collect();
        Self { a, b, c }
    }
}

/// One response per item, for callers that only pass a single parameter array.
pub fn ensure_aligned(items: usize, responses: usize) -> Result<()> {
    if items != responses {
        return Err(TriError::LengthMismatch { items, responses });
    }
    Ok(())
}
