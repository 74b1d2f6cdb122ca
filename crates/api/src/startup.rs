//! Model Bundle Loading

use data_validator::TrainingData;
use feature_engine::{CategoryPolicy, FeatureEncoder, FEATURE_COLUMNS};
use inference_engine::InferenceEngine;
use tracing::{info, warn};

use crate::config::ModelConfig;

/// Scaler-backed encoder and classifier, built once at startup and
/// read-only afterwards
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub encoder: FeatureEncoder,
    pub engine: InferenceEngine,
}

impl ModelBundle {
    pub fn new(encoder: FeatureEncoder, engine: InferenceEngine) -> Self {
        Self { encoder, engine }
    }

    /// Load the scaler and the model.
    ///
    /// Failures are logged and leave the affected part unavailable; the
    /// service keeps running and the submission route answers 503.
    pub fn load(config: &ModelConfig) -> Self {
        let policy = if config.strict_categories {
            CategoryPolicy::Strict
        } else {
            CategoryPolicy::Lenient
        };

        let encoder = match Self::load_encoder(&config.training_data_path) {
            Ok(encoder) => encoder.with_policy(policy),
            Err(e) => {
                warn!("Scaler unavailable: {}", e);
                FeatureEncoder::unavailable()
            }
        };

        let engine = match InferenceEngine::load(&config.model_path) {
            Ok(engine) => engine,
            Err(e) => {
                warn!("Model unavailable: {}", e);
                InferenceEngine::unavailable()
            }
        };

        info!(
            "Model bundle: scaler={}, model={}",
            encoder.is_available(),
            engine.is_loaded()
        );
        Self { encoder, engine }
    }

    fn load_encoder(training_data_path: &str) -> anyhow::Result<FeatureEncoder> {
        let data = TrainingData::from_csv_path(training_data_path, &FEATURE_COLUMNS)?;
        let scaler = data.fit_scaler()?;
        Ok(FeatureEncoder::new(scaler)?)
    }

    /// Both the scaler and the model are loaded
    pub fn is_ready(&self) -> bool {
        self.encoder.is_available() && self.engine.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRAINING_CSV: &str = "\
Dependents,ApplicantIncome,CoapplicantIncome,LoanAmount,Loan_Amount_Term,Credit_History,Gender_Male,Married_Yes,Education_Not Graduate,Self_Employed_Yes,Property_Area_Semiurban,Property_Area_Urban,Loan_Status
0,5849,0,128,360,1,1,0,0,0,0,1,1
1,4583,1508,128,360,1,1,1,0,0,0,0,0
0,3000,0,66,360,1,1,1,0,1,0,1,1
3,2583,2358,120,360,1,1,1,1,0,1,0,1
";

    #[test]
    fn test_missing_artefacts_leave_bundle_unavailable() {
        let config = ModelConfig {
            model_path: "/nonexistent/model.onnx".to_string(),
            training_data_path: "/nonexistent/data.csv".to_string(),
            strict_categories: false,
        };
        let bundle = ModelBundle::load(&config);
        assert!(!bundle.encoder.is_available());
        assert!(!bundle.engine.is_loaded());
        assert!(!bundle.is_ready());
    }

    #[test]
    fn test_loads_scaler_and_linear_model() {
        let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        csv.write_all(TRAINING_CSV.as_bytes()).unwrap();

        let model = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let weights = vec![0.1; FEATURE_COLUMNS.len()];
        std::fs::write(
            model.path(),
            serde_json::json!({ "intercept": 0.0, "coefficients": weights }).to_string(),
        )
        .unwrap();

        let config = ModelConfig {
            model_path: model.path().display().to_string(),
            training_data_path: csv.path().display().to_string(),
            strict_categories: true,
        };
        let bundle = ModelBundle::load(&config);

        assert!(bundle.is_ready());
        assert_eq!(bundle.encoder.policy(), CategoryPolicy::Strict);
        assert_eq!(bundle.engine.backend(), Some("linear"));
    }
}
