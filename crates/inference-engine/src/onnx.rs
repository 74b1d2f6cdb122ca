//! ONNX classifier executed with tract

use crate::engine::{Classification, LoanClassifier};
use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use std::path::Path;
use tracing::debug;
use tract_onnx::prelude::*;

type OnnxPlan = TypedSimplePlan<TypedModel>;

/// Classifier exported to ONNX (e.g. via skl2onnx).
///
/// Takes a `[1, 12]` f32 input. Output 0 holds the predicted label; an
/// optional output 1 holds class probabilities `[rejected, approved]`.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    /// Load and optimise the model
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let load_err = |e: TractError| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        };

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        debug!("ONNX plan ready for {}", path.display());
        Ok(Self { plan })
    }
}

impl LoanClassifier for OnnxClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, FEATURE_DIMENSION), features.to_f32())
                .map_err(|e| InferenceError::InvalidInputShape {
                    expected: format!("[1, {}]", FEATURE_DIMENSION),
                    actual: e.to_string(),
                })?
                .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let labels = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".into()))?
            .cast_to::<i64>()
            .map_err(|e| InferenceError::InferenceFailed(format!("label output: {}", e)))?;
        let label = labels
            .as_slice::<i64>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("empty label output".into()))?;

        let approval_probability = outputs
            .get(1)
            .and_then(|probs| probs.as_slice::<f32>().ok())
            .and_then(|probs| probs.get(1))
            .map(|p| *p as f64);

        Ok(Classification {
            label,
            approval_probability,
        })
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
