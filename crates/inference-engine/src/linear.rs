//! Linear (logistic) classifier loaded from JSON coefficients

use crate::engine::{Classification, LoanClassifier};
use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression over the scaled feature vector.
///
/// Approves when `sigmoid(intercept + coefficients . x) >= threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LinearClassifier {
    /// Create a classifier, checking the coefficient count
    pub fn new(intercept: f64, coefficients: Vec<f64>, threshold: f64) -> Result<Self, InferenceError> {
        let model = Self {
            intercept,
            coefficients,
            threshold,
        };
        model.check_shape()?;
        Ok(model)
    }

    /// Load coefficients from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;
        let model: Self = serde_json::from_str(&raw).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;
        model.check_shape()?;
        Ok(model)
    }

    fn check_shape(&self) -> Result<(), InferenceError> {
        if self.coefficients.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION.to_string(),
                actual: self.coefficients.len().to_string(),
            });
        }
        Ok(())
    }

    /// Probability of the approved class
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_slice())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }
}

impl LoanClassifier for LinearClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        let p = self.probability(features);
        Ok(Classification {
            label: if p >= self.threshold { 1 } else { 0 },
            approval_probability: Some(p),
        })
    }

    fn backend(&self) -> &'static str {
        "linear"
    }
}
