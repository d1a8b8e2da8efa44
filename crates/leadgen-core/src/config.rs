use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Inclusive range of variant counts the template generator accepts.
const TEMPLATE_VARIANTS_RANGE: std::ops::RangeInclusive<u32> = 1..=3;

/// Reads `.env` (if any), then the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if `LEADGEN_API_URL` is missing or any value fails
/// validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if `LEADGEN_API_URL` is missing or any value fails
/// validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses `var` as `T`, falling back to `default` when it is unset.
fn parse_or<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Builds the configuration from an arbitrary env-var lookup so tests can
/// feed a `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let text_or = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let api_base_url = lookup("LEADGEN_API_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar("LEADGEN_API_URL".to_string()))?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADGEN_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    let template_variants = parse_or(&lookup, "LEADGEN_TEMPLATE_VARIANTS", 3u32)?;
    if !TEMPLATE_VARIANTS_RANGE.contains(&template_variants) {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADGEN_TEMPLATE_VARIANTS".to_string(),
            reason: format!(
                "must be between {} and {}, got {template_variants}",
                TEMPLATE_VARIANTS_RANGE.start(),
                TEMPLATE_VARIANTS_RANGE.end()
            ),
        });
    }

    Ok(AppConfig {
        env: parse_environment(&text_or("LEADGEN_ENV", "development")),
        api_base_url,
        api_token: lookup("LEADGEN_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty()),
        log_level: text_or("LEADGEN_LOG_LEVEL", "info"),
        request_timeout_secs: parse_or(&lookup, "LEADGEN_REQUEST_TIMEOUT_SECS", 30)?,
        generation_timeout_secs: parse_or(&lookup, "LEADGEN_GENERATION_TIMEOUT_SECS", 120)?,
        user_agent: text_or("LEADGEN_USER_AGENT", "leadgen/0.1 (template-preview)"),
        max_retries: parse_or(&lookup, "LEADGEN_MAX_RETRIES", 2)?,
        retry_backoff_base_ms: parse_or(&lookup, "LEADGEN_RETRY_BACKOFF_BASE_MS", 500)?,
        template_variants,
        export_dir: PathBuf::from(text_or("LEADGEN_EXPORT_DIR", "./exports")),
    })
}

/// Unrecognized values fall back to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim().to_ascii_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
