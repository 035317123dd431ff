//! Error types for the input boundary.
//!
//! The numeric core never fails: it works under the documented preconditions
//! and falls back to `θ = 0` when the optimiser gives up. These errors are
//! produced only where untrusted input enters the crate: item tables,
//! configuration files, [`crate::engine::TriEngine::evaluate`] and the Python
//! bindings.

use thiserror::Error;

/// Errors raised while validating or loading inputs.
#[derive(Debug, Error)]
pub enum TriError {
    /// The response vector and the item bank have different lengths.
    #[error("{responses} responses supplied for {items} items")]
    LengthMismatch { items: usize, responses: usize },

    /// The three parameter arrays are not parallel.
    #[error("parameter arrays differ in length (a: {a}, b: {b}, c: {c})")]
    RaggedParameters { a: usize, b: usize, c: usize },

    /// A response other than 0 or 1.
    #[error("response {index} is {value}, expected 0 or 1")]
    NonBinaryResponse { index: usize, value: i32 },

    /// A guessing parameter outside `[0, 1)`.
    #[error("guessing parameter of item {index} is {value}, expected a value in [0, 1)")]
    InvalidGuessing { index: usize, value: f64 },

    /// NaN or infinite item parameter.
    #[error("item {index} has a non-finite parameter")]
    NonFiniteParameter { index: usize },

    /// The item table lacks one of the `a`, `b`, `c` columns.
    #[error("item table is missing column '{0}'")]
    MissingColumn(&'static str),

    /// A table row does not match the header width.
    #[error("row {row} has {found} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Malformed configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TriError {
    fn from(err: toml::de::Error) -> Self {
        TriError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = TriError::LengthMismatch {
            items: 45,
            responses: 44,
        };
        assert_eq!(err.to_string(), "44 responses supplied for 45 items");

        let err = TriError::NonBinaryResponse { index: 3, value: 2 };
        assert_eq!(err.to_string(), "response 3 is 2, expected 0 or 1");

        assert_eq!(
            TriError::MissingColumn("b").to_string(),
            "item table is missing column 'b'"
        );
    }

    #[test]
    fn toml_errors_become_config_errors() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("scale = [");
        let err: TriError = parse.unwrap_err().into();
        assert!(matches!(err, TriError::Config(_)));
    }
}
