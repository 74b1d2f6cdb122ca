//! Feature Encoder

use crate::application::{fields, LoanApplication};
use crate::features::{FeatureVector, FEATURE_DIMENSION};
use crate::EncodeError;
use data_validator::{
    StandardScaler, ValidationError, Validator, DEPENDENTS, EDUCATION, GENDERS, PROPERTY_AREAS,
    YES_NO,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// How unrecognised categorical values are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Anything other than the indicator's value encodes as 0
    #[default]
    Lenient,
    /// Categories must belong to their enumerated set and numeric fields to
    /// their domain
    Strict,
}

/// Maps a raw submission to the scaled model input.
///
/// Holds the scaler fitted at startup. An encoder built without one (the
/// training data failed to load) rejects every call with
/// [`EncodeError::ScalerUnavailable`].
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    scaler: Option<StandardScaler>,
    policy: CategoryPolicy,
    validator: Validator,
}

impl FeatureEncoder {
    /// Create an encoder around a fitted scaler
    pub fn new(scaler: StandardScaler) -> Result<Self, EncodeError> {
        if scaler.n_features() != FEATURE_DIMENSION {
            return Err(EncodeError::Scaling(ValidationError::DimensionMismatch {
                expected: FEATURE_DIMENSION,
                actual: scaler.n_features(),
            }));
        }
        info!(
            "Feature encoder ready (scaler fitted on {} samples)",
            scaler.samples_seen()
        );
        Ok(Self {
            scaler: Some(scaler),
            policy: CategoryPolicy::default(),
            validator: Validator::default(),
        })
    }

    /// Create an encoder whose scaler failed to load
    pub fn unavailable() -> Self {
        Self {
            scaler: None,
            policy: CategoryPolicy::default(),
            validator: Validator::default(),
        }
    }

    /// Set the categorical value policy
    pub fn with_policy(mut self, policy: CategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn is_available(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn policy(&self) -> CategoryPolicy {
        self.policy
    }

    /// Encode and scale a raw submission into the model input
    pub fn encode_and_scale(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<FeatureVector, EncodeError> {
        self.encode_submission(form).map(|(_, features)| features)
    }

    /// Parse, encode, and scale a raw submission, returning the parsed
    /// application alongside the model input
    pub fn encode_submission(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<(LoanApplication, FeatureVector), EncodeError> {
        let scaler = self.scaler.as_ref().ok_or(EncodeError::ScalerUnavailable)?;

        let application = LoanApplication::from_fields(form)?;
        if self.policy == CategoryPolicy::Strict {
            self.validate(&application)?;
        }

        let raw = application.to_raw_features();
        let scaled = scaler.transform(raw.as_slice())?;
        debug!("Encoded application: {:?}", raw.as_slice());

        Ok((application, FeatureVector::from_slice(&scaled)?))
    }

    fn validate(&self, app: &LoanApplication) -> Result<(), EncodeError> {
        let v = &self.validator;
        let categories: [(&'static str, &str, &'static [&'static str]); 6] = [
            (fields::GENDER, app.gender.as_str(), GENDERS),
            (fields::MARRIED, app.married.as_str(), YES_NO),
            (fields::DEPENDENTS, app.dependents.as_str(), DEPENDENTS),
            (fields::EDUCATION, app.education.as_str(), EDUCATION),
            (fields::SELF_EMPLOYED, app.self_employed.as_str(), YES_NO),
            (fields::PROPERTY_AREA, app.property_area.as_str(), PROPERTY_AREAS),
        ];
        for (field, value, allowed) in categories {
            v.validate_category(field, value, allowed)
                .map_err(|e| EncodeError::invalid(field, value, e.to_string()))?;
        }

        let numeric = |field: &'static str, value: f64, check: Result<(), ValidationError>| {
            check.map_err(|e| EncodeError::invalid(field, &value.to_string(), e.to_string()))
        };
        numeric(
            fields::APPLICANT_INCOME,
            app.applicant_income,
            v.validate_income(fields::APPLICANT_INCOME, app.applicant_income),
        )?;
        numeric(
            fields::COAPPLICANT_INCOME,
            app.coapplicant_income,
            v.validate_income(fields::COAPPLICANT_INCOME, app.coapplicant_income),
        )?;
        numeric(
            fields::LOAN_AMOUNT,
            app.loan_amount,
            v.validate_loan_amount(app.loan_amount),
        )?;
        numeric(fields::LOAN_TERM, app.loan_term, v.validate_loan_term(app.loan_term))?;
        app.loan_term_months()?;
        numeric(
            fields::CREDIT_HISTORY,
            app.credit_history,
            v.validate_credit_history(app.credit_history),
        )?;

        Ok(())
    }
}
