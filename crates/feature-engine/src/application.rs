//! Loan Application Parsing

use crate::features::{FeatureVector, FEATURE_DIMENSION};
use crate::EncodeError;
use std::collections::HashMap;

/// Submitted form field names
pub mod fields {
    pub const GENDER: &str = "gender";
    pub const MARRIED: &str = "married";
    pub const DEPENDENTS: &str = "dependents";
    pub const EDUCATION: &str = "education";
    pub const SELF_EMPLOYED: &str = "self_employed";
    pub const APPLICANT_INCOME: &str = "applicant_income";
    pub const COAPPLICANT_INCOME: &str = "coapplicant_income";
    pub const LOAN_AMOUNT: &str = "loan_amount";
    pub const LOAN_TERM: &str = "loan_term";
    pub const CREDIT_HISTORY: &str = "credit_history";
    pub const PROPERTY_AREA: &str = "property_area";
}

/// A parsed loan application.
///
/// Categorical fields keep the submitted strings; numeric fields are parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplication {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: f64,
    pub credit_history: f64,
    pub property_area: String,
    /// Numeric form of `dependents` ("3+" counts as 3)
    dependents_count: f64,
}

impl LoanApplication {
    /// Parse a raw form submission.
    ///
    /// Numeric fields must be present and parse as reals. Categorical fields
    /// are taken verbatim; an absent one is treated as an empty string.
    pub fn from_fields(form: &HashMap<String, String>) -> Result<Self, EncodeError> {
        let category = |name: &str| form.get(name).cloned().unwrap_or_default();

        let dependents = category(fields::DEPENDENTS);
        let dependents_count = parse_dependents(&dependents)?;

        Ok(Self {
            gender: category(fields::GENDER),
            married: category(fields::MARRIED),
            education: category(fields::EDUCATION),
            self_employed: category(fields::SELF_EMPLOYED),
            property_area: category(fields::PROPERTY_AREA),
            applicant_income: parse_real(form, fields::APPLICANT_INCOME)?,
            coapplicant_income: parse_real(form, fields::COAPPLICANT_INCOME)?,
            loan_amount: parse_real(form, fields::LOAN_AMOUNT)?,
            loan_term: parse_real(form, fields::LOAN_TERM)?,
            credit_history: parse_real(form, fields::CREDIT_HISTORY)?,
            dependents,
            dependents_count,
        })
    }

    /// Numeric dependents count
    pub fn dependents_count(&self) -> f64 {
        self.dependents_count
    }

    /// Loan term as whole months, as persisted
    pub fn loan_term_months(&self) -> Result<i64, EncodeError> {
        let term = self.loan_term;
        if term.is_finite() && term.fract() == 0.0 && term.abs() <= i64::MAX as f64 {
            Ok(term as i64)
        } else {
            Err(EncodeError::invalid(
                fields::LOAN_TERM,
                &term.to_string(),
                "loan term must be a whole number of months",
            ))
        }
    }

    /// Unscaled model input in training column order
    pub fn to_raw_features(&self) -> FeatureVector {
        let flag = |hit: bool| if hit { 1.0 } else { 0.0 };

        let values: [f64; FEATURE_DIMENSION] = [
            self.dependents_count,
            self.applicant_income,
            self.coapplicant_income,
            self.loan_amount,
            self.loan_term,
            self.credit_history,
            flag(self.gender == "Male"),
            flag(self.married == "Yes"),
            flag(self.education == "Not Graduate"),
            flag(self.self_employed == "Yes"),
            // Rural is the implicit third category: (0, 0)
            flag(self.property_area == "Semiurban"),
            flag(self.property_area == "Urban"),
        ];

        FeatureVector::new(values)
    }
}

fn parse_dependents(raw: &str) -> Result<f64, EncodeError> {
    let trimmed = raw.trim();
    if trimmed == "3+" {
        return Ok(3.0);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| EncodeError::invalid(fields::DEPENDENTS, raw, "expected 0, 1, 2 or 3+"))?;
    finite(fields::DEPENDENTS, raw, value)
}

fn parse_real(form: &HashMap<String, String>, field: &'static str) -> Result<f64, EncodeError> {
    let raw = form
        .get(field)
        .ok_or_else(|| EncodeError::invalid(field, "", "field is required"))?;
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| EncodeError::invalid(field, raw, "expected a number"))?;
    finite(field, raw, value)
}

/// `f64::from_str` also accepts "NaN" and "inf"
fn finite(field: &'static str, raw: &str, value: f64) -> Result<f64, EncodeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EncodeError::invalid(field, raw, "expected a finite number"))
    }
}
