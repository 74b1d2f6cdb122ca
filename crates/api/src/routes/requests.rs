//! Loan Request Routes

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use feature_engine::EncodeError;
use metrics::{counter, histogram};
use serde::Serialize;
use std::collections::HashMap;
use storage::{LoanRequestRecord, NewLoanRequest};
use tracing::info;

use crate::error::ApiError;
use crate::SharedState;

/// Where successful submissions and deletions redirect to
pub const LISTING_PATH: &str = "/view_requests";

/// Response for the listing endpoint
#[derive(Debug, Serialize)]
pub struct RequestListResponse {
    pub data: Vec<LoanRequestRecord>,
    pub count: usize,
}

/// Encode, predict, and persist a form submission
pub async fn add_request(
    State(state): State<SharedState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    let (application, features, loan_term) = state
        .models
        .encoder
        .encode_submission(&form)
        .and_then(|(application, features)| {
            let loan_term = application.loan_term_months()?;
            Ok((application, features, loan_term))
        })
        .map_err(|e| {
            if matches!(e, EncodeError::InvalidInput { .. }) {
                counter!("loan_requests_invalid_total").increment(1);
            }
            e
        })?;

    let result = state.models.engine.predict(&features)?;
    histogram!("loan_inference_latency_seconds").record(result.latency_us as f64 / 1_000_000.0);

    let decision = result.decision;

    let id = state
        .repository
        .insert(NewLoanRequest {
            gender: application.gender,
            married: application.married,
            dependents: application.dependents,
            education: application.education,
            self_employed: application.self_employed,
            applicant_income: application.applicant_income,
            coapplicant_income: application.coapplicant_income,
            loan_amount: application.loan_amount,
            loan_term,
            credit_history: application.credit_history,
            property_area: application.property_area,
            prediction: decision.as_str().to_string(),
        })
        .await?;

    counter!("loan_requests_submitted_total", "decision" => decision.as_str()).increment(1);
    info!("Stored loan request {} ({})", id, decision);

    Ok(Redirect::to(LISTING_PATH))
}

/// List all stored requests
pub async fn view_requests(
    State(state): State<SharedState>,
) -> Result<Json<RequestListResponse>, ApiError> {
    let data = state.repository.list().await?;
    Ok(Json(RequestListResponse {
        count: data.len(),
        data,
    }))
}

/// Delete one request by id
pub async fn delete_request(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Redirect, ApiError> {
    state.repository.delete(id).await?;
    counter!("loan_requests_deleted_total").increment(1);
    info!("Deleted loan request {}", id);
    Ok(Redirect::to(LISTING_PATH))
}
