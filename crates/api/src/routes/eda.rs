//! Exploratory Analysis Routes

use analytics::{build_dashboard, Dashboard};
use axum::{extract::State, Json};

use crate::config::ModelMetrics;
use crate::SharedState;

/// Exploratory chart data over all stored requests.
///
/// Storage failures are reported inside the dashboard rather than as an
/// error status, so the view can always render.
pub async fn eda(State(state): State<SharedState>) -> Json<Dashboard> {
    let dashboard = match state.repository.list().await {
        Ok(records) => build_dashboard(&records),
        Err(e) => Dashboard::with_error(format!("An unexpected error occurred: {}", e)),
    };
    Json(dashboard)
}

/// Offline model quality figures
pub async fn model_metrics(State(state): State<SharedState>) -> Json<ModelMetrics> {
    Json(state.model_metrics.clone())
}
