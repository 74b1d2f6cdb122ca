//! Inference Engine Implementation

use crate::linear::LinearClassifier;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Loan decision derived from the model label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanDecision {
    Approved,
    Rejected,
}

impl LoanDecision {
    /// Label 1 means approved; every other label is a rejection
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            LoanDecision::Approved
        } else {
            LoanDecision::Rejected
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanDecision::Approved => "Approved",
            LoanDecision::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for LoanDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classifier output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Predicted class label
    pub label: i64,
    /// Probability of the approved class, when the model reports one
    pub approval_probability: Option<f64>,
}

/// A binary classifier over the loan feature vector
pub trait LoanClassifier: Send + Sync {
    /// Classify one scaled feature vector
    fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The decision
    pub decision: LoanDecision,
    /// Probability of approval, if available
    pub confidence: Option<f64>,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Inference engine wrapping the classifier loaded at startup
#[derive(Clone)]
pub struct InferenceEngine {
    /// Model path
    model_path: String,
    /// Loaded classifier; `None` when loading failed
    classifier: Option<Arc<dyn LoanClassifier>>,
}

impl InferenceEngine {
    /// Load a model file, choosing the backend by extension
    /// (`.json` for a linear model, anything else as ONNX)
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = model_path.as_ref();
        info!("Loading inference model: {}", path.display());

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let classifier: Arc<dyn LoanClassifier> = if is_json {
            Arc::new(LinearClassifier::from_path(path)?)
        } else {
            Arc::new(OnnxClassifier::load(path)?)
        };

        info!("Model loaded successfully ({} backend)", classifier.backend());
        Ok(Self {
            model_path: path.display().to_string(),
            classifier: Some(classifier),
        })
    }

    /// Wrap an already constructed classifier
    pub fn with_classifier(classifier: impl LoanClassifier + 'static) -> Self {
        Self {
            model_path: classifier.backend().to_string(),
            classifier: Some(Arc::new(classifier)),
        }
    }

    /// Engine for a model that failed to load
    pub fn unavailable() -> Self {
        Self {
            model_path: String::new(),
            classifier: None,
        }
    }

    /// Run inference on a scaled feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        let classifier = self
            .classifier
            .as_ref()
            .ok_or(InferenceError::ModelUnavailable)?;
        let output = classifier.classify(features)?;

        let latency_us = start.elapsed().as_micros() as u64;
        let decision = LoanDecision::from_label(output.label);
        debug!(
            "Inference completed in {}us: label={} ({})",
            latency_us, output.label, decision
        );

        Ok(InferenceResult {
            decision,
            confidence: output.approval_probability,
            latency_us,
        })
    }

    /// Check if a model is loaded
    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Backend name of the loaded classifier
    pub fn backend(&self) -> Option<&'static str> {
        self.classifier.as_ref().map(|c| c.backend())
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("model_path", &self.model_path)
            .field("backend", &self.backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FEATURE_DIMENSION;

    struct FixedLabel(i64);

    impl LoanClassifier for FixedLabel {
        fn classify(&self, _features: &FeatureVector) -> Result<Classification, InferenceError> {
            Ok(Classification {
                label: self.0,
                approval_probability: None,
            })
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(LoanDecision::from_label(1), LoanDecision::Approved);
        assert_eq!(LoanDecision::from_label(0), LoanDecision::Rejected);
        assert_eq!(LoanDecision::from_label(2), LoanDecision::Rejected);
        assert_eq!(LoanDecision::Approved.to_string(), "Approved");
    }

    #[test]
    fn test_predict_with_classifier() {
        let engine = InferenceEngine::with_classifier(FixedLabel(1));
        assert!(engine.is_loaded());

        let features = FeatureVector::new([0.0; FEATURE_DIMENSION]);
        let result = engine.predict(&features).unwrap();
        assert_eq!(result.decision, LoanDecision::Approved);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_unavailable_engine() {
        let engine = InferenceEngine::unavailable();
        assert!(!engine.is_loaded());

        let features = FeatureVector::new([0.0; FEATURE_DIMENSION]);
        assert!(matches!(
            engine.predict(&features),
            Err(InferenceError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_load_missing_onnx_file() {
        let err = InferenceEngine::load("/nonexistent/best_loan_model.onnx").unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }

    #[test]
    fn test_load_linear_model_by_extension() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let coefficients = vec![0.0; FEATURE_DIMENSION];
        let model = serde_json::json!({ "intercept": 2.0, "coefficients": coefficients });
        std::fs::write(file.path(), model.to_string()).unwrap();

        let engine = InferenceEngine::load(file.path()).unwrap();
        assert_eq!(engine.backend(), Some("linear"));

        let result = engine
            .predict(&FeatureVector::new([0.0; FEATURE_DIMENSION]))
            .unwrap();
        assert_eq!(result.decision, LoanDecision::Approved);
    }
}
