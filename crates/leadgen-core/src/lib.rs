//! Shared domain model for the lead-generation dashboard client.
//!
//! Holds the read-only business records, evaluations and AI-generated
//! templates as received from the dashboard API, the score gate that decides
//! whether preview affordances are shown, and environment-driven config.

pub mod app_config;
pub mod business;
pub mod config;
pub mod score;
pub mod template;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use business::{Business, BusinessId, Evaluation};
pub use config::{load_app_config, load_app_config_from_env};
pub use score::{is_qualified_lead, ScoreBand, HIGH_SCORE_THRESHOLD, QUALIFIED_LEAD_THRESHOLD};
pub use template::{Impact, Improvement, Template, TemplateSet};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
