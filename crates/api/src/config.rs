//! Service Configuration
//!
//! Layered with the `config` crate: built-in defaults, then optional
//! `config/default` and `config/{LOAN_ENV}` files, then `LOAN_SERVICE__*`
//! environment variables (e.g. `LOAN_SERVICE__SERVER__ADDR`).

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LOAN_SERVICE";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
    /// Pool size (in-memory databases always use one connection)
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://loan_requests.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Model and scaler artefacts loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Classifier file (`.onnx`, or `.json` for a linear model)
    pub model_path: String,
    /// Processed training CSV the scaler is fitted on
    pub training_data_path: String,
    /// Reject categorical values outside their enumerated sets
    pub strict_categories: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: "best_loan_model.onnx".to_string(),
            training_data_path: "processed_loan_data.csv".to_string(),
            strict_categories: false,
        }
    }
}

/// Offline evaluation figures reported by `/model_metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self {
            accuracy: 0.87,
            precision: 0.85,
            recall: 0.86,
            f1: 0.86,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Full service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub model_metrics: ModelMetrics,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from the default file locations and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("LOAN_ENV").unwrap_or_else(|_| "development".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        Self::finish(builder)
    }

    /// Load defaults overlaid with one required file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.add_source(File::from(path).required(true)))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder().add_source(Config::try_from(&AppConfig::default())?))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.addr.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Message(format!("server.addr {:?}: {}", self.server.addr, e))
        })?;

        let metrics = &self.model_metrics;
        for (name, value) in [
            ("accuracy", metrics.accuracy),
            ("precision", metrics.precision),
            ("recall", metrics.recall),
            ("f1", metrics.f1),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Message(format!(
                    "model_metrics.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.rate_limit.enabled
            && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0)
        {
            return Err(ConfigError::Message(
                "rate_limit.per_second and rate_limit.burst_size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
