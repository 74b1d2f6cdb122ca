//! Loan Approval Inference Engine
//!
//! Runs the pre-trained approval classifier. The model is loaded once at
//! startup from an ONNX file (executed with tract) or a JSON linear model.

mod engine;
mod linear;
mod onnx;

pub use engine::{Classification, InferenceEngine, InferenceResult, LoanClassifier, LoanDecision};
pub use linear::LinearClassifier;
pub use onnx::OnnxClassifier;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Model not loaded")]
    ModelUnavailable,
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}
