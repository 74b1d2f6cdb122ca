//! Service Index, Health, and Metrics Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::SharedState;

/// Service index
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: String,
    pub routes: Vec<&'static str>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub request_count: Option<i64>,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub scaler: ComponentHealth,
    pub model: ComponentHealth,
    pub database: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    #[serde(skip)]
    pub ok: bool,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentHealth {
    fn from_flag(ok: bool, detail: Option<String>) -> Self {
        Self {
            ok,
            status: if ok { "ok" } else { "unavailable" },
            detail,
        }
    }
}

/// Service index handler
pub async fn index(State(state): State<SharedState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "loan-service",
        version: state.version.clone(),
        routes: vec![
            "GET /api/v1/health",
            "POST /add_request",
            "GET /view_requests",
            "GET /delete_request/:id",
            "GET /eda",
            "GET /model_metrics",
            "GET /metrics",
        ],
    })
}

/// Health check handler
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let request_count = state.repository.count().await.ok();
    let models = &state.models;

    let components = ComponentStatus {
        scaler: ComponentHealth::from_flag(
            models.encoder.is_available(),
            Some(format!("{:?} category policy", models.encoder.policy()).to_lowercase()),
        ),
        model: ComponentHealth::from_flag(
            models.engine.is_loaded(),
            models.engine.backend().map(str::to_string),
        ),
        database: ComponentHealth::from_flag(request_count.is_some(), None),
    };

    let healthy = components.scaler.ok && components.model.ok && components.database.ok;

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components,
        request_count,
    })
}

/// Prometheus exposition
pub async fn prometheus(State(state): State<SharedState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_status_follows_flag() {
        let up = ComponentHealth::from_flag(true, None);
        assert!(up.ok);
        assert_eq!(up.status, "ok");

        let down = ComponentHealth::from_flag(false, Some("onnx".to_string()));
        assert!(!down.ok);
        assert_eq!(down.status, "unavailable");

        let json = serde_json::to_value(&down).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unavailable", "detail": "onnx" }));
    }
}
