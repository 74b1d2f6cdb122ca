//! Exploratory Dashboard

use crate::charts::{Figure, ValueCounts};
use serde::Serialize;
use std::collections::BTreeMap;
use storage::LoanRequestRecord;
use tracing::debug;

/// Message returned when there is nothing to chart
pub const NO_DATA_MESSAGE: &str = "No loan applications found in the database.";

/// Count, mean, and extremes of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn compute(column: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        Some(Self {
            column: column.to_string(),
            count: values.len(),
            mean: values.iter().sum::<f64>() / n,
            min: values.iter().cloned().fold(f64::MAX, f64::min),
            max: values.iter().cloned().fold(f64::MIN, f64::max),
        })
    }
}

/// Chart data for the exploratory view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Figures keyed by chart name (`gender`, `approval`, `income`)
    pub plots: BTreeMap<String, Figure>,
    /// Summary of numeric columns
    pub summary: Vec<ColumnSummary>,
    /// Number of records charted
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Dashboard {
    /// A dashboard with no plots, carrying a message for the viewer
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            plots: BTreeMap::new(),
            summary: Vec::new(),
            total: 0,
            error: Some(message.into()),
        }
    }
}

/// Build the dashboard over all stored requests
pub fn build_dashboard(records: &[LoanRequestRecord]) -> Dashboard {
    if records.is_empty() {
        return Dashboard::with_error(NO_DATA_MESSAGE);
    }

    let gender = ValueCounts::tally(records.iter().map(|r| r.gender.as_str()));
    let approval = ValueCounts::tally(records.iter().map(|r| r.prediction.as_str()));
    let incomes: Vec<f64> = records.iter().map(|r| r.applicant_income).collect();
    let amounts: Vec<f64> = records.iter().map(|r| r.loan_amount).collect();

    let mut plots = BTreeMap::new();
    plots.insert("gender".to_string(), Figure::pie(&gender, "Gender Distribution"));
    plots.insert(
        "approval".to_string(),
        Figure::pie(&approval, "Loan Approval Distribution"),
    );

    let summary: Vec<ColumnSummary> = [("applicant_income", &incomes), ("loan_amount", &amounts)]
        .into_iter()
        .filter_map(|(column, values)| ColumnSummary::compute(column, values))
        .collect();

    plots.insert(
        "income".to_string(),
        Figure::histogram(incomes, "Applicant Income Distribution"),
    );

    debug!("Built dashboard over {} records", records.len());

    Dashboard {
        plots,
        summary,
        total: records.len(),
        error: None,
    }
}
