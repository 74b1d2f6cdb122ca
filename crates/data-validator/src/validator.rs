//! Category and Range Validation for Loan Applications

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Accepted gender values
pub const GENDERS: &[&str] = &["Male", "Female"];
/// Accepted yes/no values (married, self employed)
pub const YES_NO: &[&str] = &["Yes", "No"];
/// Accepted dependents categories
pub const DEPENDENTS: &[&str] = &["0", "1", "2", "3+"];
/// Accepted education values
pub const EDUCATION: &[&str] = &["Graduate", "Not Graduate"];
/// Accepted property areas
pub const PROPERTY_AREAS: &[&str] = &["Rural", "Semiurban", "Urban"];

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Applicant and co-applicant income valid range
    pub income_range: (f64, f64),
    /// Requested loan amount valid range
    pub loan_amount_range: (f64, f64),
    /// Loan term valid range (months)
    pub loan_term_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            income_range: (0.0, f64::MAX),
            loan_amount_range: (0.0, f64::MAX),
            loan_term_range: (1.0, f64::MAX),
        }
    }
}

/// Validator for loan application fields
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value.is_nan() || value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a categorical value against its enumerated set
    pub fn validate_category(
        &self,
        field: &'static str,
        value: &str,
        allowed: &'static [&'static str],
    ) -> Result<(), ValidationError> {
        if allowed.contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::UnknownCategory {
                field,
                value: value.to_string(),
                allowed,
            })
        }
    }

    /// Validate an income figure
    pub fn validate_income(&self, field: &'static str, income: f64) -> Result<(), ValidationError> {
        self.validate_range(field, income, self.config.income_range)
    }

    /// Validate the requested loan amount
    pub fn validate_loan_amount(&self, amount: f64) -> Result<(), ValidationError> {
        self.validate_range("loan_amount", amount, self.config.loan_amount_range)
    }

    /// Validate the loan term in months
    pub fn validate_loan_term(&self, months: f64) -> Result<(), ValidationError> {
        self.validate_range("loan_term", months, self.config.loan_term_range)
    }

    /// Credit history is a flag: exactly 0 or 1
    pub fn validate_credit_history(&self, value: f64) -> Result<(), ValidationError> {
        if value == 0.0 || value == 1.0 {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field: "credit_history",
                value,
                min: 0.0,
                max: 1.0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_accepts_enumerated_values() {
        let validator = Validator::default();
        for area in PROPERTY_AREAS {
            assert!(validator.validate_category("property_area", area, PROPERTY_AREAS).is_ok());
        }
        assert!(validator.validate_category("education", "Not Graduate", EDUCATION).is_ok());
    }

    #[test]
    fn test_category_rejects_typos() {
        let validator = Validator::default();
        let err = validator.validate_category("gender", "amle", GENDERS).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory { field: "gender", .. }));
        assert!(validator.validate_category("gender", "", GENDERS).is_err());
        assert!(validator.validate_category("married", "yes", YES_NO).is_err());
    }

    #[test]
    fn test_income_range() {
        let validator = Validator::default();
        assert!(validator.validate_income("applicant_income", 0.0).is_ok());
        assert!(validator.validate_income("applicant_income", 5849.0).is_ok());
        assert!(validator.validate_income("applicant_income", -1.0).is_err());
        assert!(validator.validate_income("applicant_income", f64::NAN).is_err());
    }

    #[test]
    fn test_loan_term_must_be_positive() {
        let validator = Validator::default();
        assert!(validator.validate_loan_term(360.0).is_ok());
        assert!(validator.validate_loan_term(0.0).is_err());
    }

    #[test]
    fn test_credit_history_flag() {
        let validator = Validator::default();
        assert!(validator.validate_credit_history(0.0).is_ok());
        assert!(validator.validate_credit_history(1.0).is_ok());
        assert!(validator.validate_credit_history(0.5).is_err());
    }
}
