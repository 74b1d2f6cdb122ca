//! Validation Error Types

use thiserror::Error;

/// Errors during data validation, scaling, and training data loading
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Categorical value outside its enumerated set
    #[error("{field} value {value:?} is not one of {allowed:?}")]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Vector length does not match the fitted column count
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required column
    #[error("Missing required column: {0}")]
    MissingField(String),

    /// Nothing to fit on
    #[error("Cannot fit scaler on an empty data set")]
    EmptyDataSet,
}
