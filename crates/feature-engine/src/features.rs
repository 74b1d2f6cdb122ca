//! Feature Vector Layout

use crate::EncodeError;
use serde::{Deserialize, Serialize};

/// Number of model input columns
pub const FEATURE_DIMENSION: usize = 12;

/// Model input columns, in training order
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "Dependents",
    "ApplicantIncome",
    "CoapplicantIncome",
    "LoanAmount",
    "Loan_Amount_Term",
    "Credit_History",
    "Gender_Male",
    "Married_Yes",
    "Education_Not Graduate",
    "Self_Employed_Yes",
    "Property_Area_Semiurban",
    "Property_Area_Urban",
];

/// Feature vector for ML inference, one value per entry of [`FEATURE_COLUMNS`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_DIMENSION]) -> Self {
        Self { values }
    }

    /// Build from a slice, which must have exactly [`FEATURE_DIMENSION`] values
    pub fn from_slice(values: &[f64]) -> Result<Self, EncodeError> {
        let values: [f64; FEATURE_DIMENSION] = values.try_into().map_err(|_| {
            EncodeError::Scaling(data_validator::ValidationError::DimensionMismatch {
                expected: FEATURE_DIMENSION,
                actual: values.len(),
            })
        })?;
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Look up a value by training column name
    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.values[idx])
    }

    /// Column name and value pairs in training order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    /// Single-precision copy for model runtimes that take f32 tensors
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }

    pub fn len(&self) -> usize {
        FEATURE_DIMENSION
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
