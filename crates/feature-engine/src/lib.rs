//! Feature Engineering Engine
//!
//! Turns a raw loan application submission into the fixed-order, scaled
//! feature vector the approval model was trained on.

mod application;
mod encoder;
mod features;

pub use application::{fields, LoanApplication};
pub use encoder::{CategoryPolicy, FeatureEncoder};
pub use features::{FeatureVector, FEATURE_COLUMNS, FEATURE_DIMENSION};

use data_validator::ValidationError;
use thiserror::Error;

/// Errors during feature encoding
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A submitted field is missing or cannot be interpreted
    #[error("Invalid input for {field} ({value:?}): {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// The scaler failed to load at startup
    #[error("Scaler not loaded")]
    ScalerUnavailable,
    /// The fitted scaler does not match the feature layout
    #[error("Scaling failed: {0}")]
    Scaling(#[from] ValidationError),
}

impl EncodeError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        EncodeError::InvalidInput {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
