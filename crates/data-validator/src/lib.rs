//! Data Validation and Normalization
//!
//! Provides the fitted standard scaler, training data loading, and
//! category/range validation for loan application features.

mod dataset;
mod error;
mod normalizer;
mod validator;

pub use dataset::{TrainingData, TARGET_COLUMN};
pub use error::ValidationError;
pub use normalizer::StandardScaler;
pub use validator::{
    ValidationConfig, Validator, DEPENDENTS, EDUCATION, GENDERS, PROPERTY_AREAS, YES_NO,
};
