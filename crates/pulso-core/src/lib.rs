//! Shared configuration for the pulso workspace.
//!
//! Every knob the analysis engine, the upload endpoint, and the optional
//! narrative summarizer expose is read from `PULSO_*` environment variables
//! with working defaults, so the service runs with an empty environment.

pub mod app_config;
pub mod config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
