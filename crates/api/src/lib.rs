//! Loan Approval API Server
//!
//! HTTP service that scores loan applications, stores them, and serves
//! exploratory chart data over past submissions.

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;
pub mod startup;

pub use config::{AppConfig, LoggingConfig, ModelMetrics};
pub use error::ApiError;
pub use rate_limit::RateLimitConfig;
pub use startup::ModelBundle;

use storage::Repository;

/// Application state shared across handlers; immutable after startup
pub struct AppState {
    /// Storage repository
    pub repository: Repository,
    /// Scaler and classifier loaded at startup
    pub models: ModelBundle,
    /// Figures reported by `/model_metrics`
    pub model_metrics: ModelMetrics,
    /// Prometheus handle, when the recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(repository: Repository, models: ModelBundle, model_metrics: ModelMetrics) -> Self {
        Self {
            repository,
            models,
            model_metrics,
            metrics_handle: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach the Prometheus handle served at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Create the application router.
///
/// With a rate limit the submission route is keyed by peer IP, which
/// requires serving with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: SharedState, rate_limit: Option<&RateLimitConfig>) -> Router {
    let mut submit = post(routes::requests::add_request);
    if let Some(config) = rate_limit {
        match rate_limit::create_governor_config(config) {
            Some(governor) => submit = submit.layer(GovernorLayer { config: governor }),
            None => warn!("Invalid rate limit {:?}, submissions are not limited", config),
        }
    }

    Router::new()
        .route("/", get(routes::system::index))
        .route("/api/v1/health", get(routes::system::health))
        .route("/metrics", get(routes::system::prometheus))
        .route("/add_request", submit)
        .route("/view_requests", get(routes::requests::view_requests))
        .route("/delete_request/:id", get(routes::requests::delete_request))
        .route("/eda", get(routes::eda::eda))
        .route("/model_metrics", get(routes::eda::model_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = Level::from_str(&config.level)
        .map_err(|e| anyhow::anyhow!("logging.level {:?}: {}", config.level, e))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Run the server until interrupted
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let repository =
        Repository::connect(&config.database.url, config.database.max_connections).await?;
    let models = ModelBundle::load(&config.model);

    let mut state = AppState::new(repository, models, config.model_metrics.clone());
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics recorder not installed: {}", e),
    }

    let rate_limit = config.rate_limit.enabled.then_some(&config.rate_limit);
    let app = create_router(Arc::new(state), rate_limit);

    info!("Starting API server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests;
