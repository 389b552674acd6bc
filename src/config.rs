//! Configuration management for the workflow service.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `DEFAULT_MODEL` - Optional. The planning model. Defaults to `google/gemini-2.5-flash`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `PLAN_MAX_RETRIES` - Optional. Retries after the first plan attempt. Defaults to `2`, at most `5`.
//! - `PLAN_TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.2`.
//! - `PLAN_RETRY_BASE_DELAY_MS` - Optional. Backoff unit in milliseconds. Defaults to `500`.
//! - `PLAN_DEADLINE_SECS` - Optional. Overall deadline for one plan request.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::plan::{PlanConfig, MAX_RETRIES_LIMIT};

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// OpenRouter API key
    pub api_key: String,

    /// Model identifier (OpenRouter format) used for plan generation
    pub default_model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Retry, sampling and deadline settings for plan generation
    pub plan: PlanConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("default_model", &self.default_model)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("plan", &self.plan)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set,
    /// and `ConfigError::InvalidValue` for any value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let default_model = lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let defaults = PlanConfig::default();
        let max_retries = parse_or(&lookup, "PLAN_MAX_RETRIES", defaults.max_retries)?;
        if max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::InvalidValue(
                "PLAN_MAX_RETRIES".to_string(),
                format!("{} exceeds the limit of {}", max_retries, MAX_RETRIES_LIMIT),
            ));
        }

        let temperature = parse_or(&lookup, "PLAN_TEMPERATURE", defaults.temperature)?;
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ConfigError::InvalidValue(
                "PLAN_TEMPERATURE".to_string(),
                format!("{} is not a non-negative number", temperature),
            ));
        }

        let base_delay_ms = parse_or(
            &lookup,
            "PLAN_RETRY_BASE_DELAY_MS",
            defaults.retry_base_delay.as_millis() as u64,
        )?;

        let deadline = match lookup("PLAN_DEADLINE_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_value("PLAN_DEADLINE_SECS", &raw)?)),
            None => None,
        };

        Ok(Self {
            api_key,
            default_model,
            host,
            port,
            plan: PlanConfig {
                max_retries,
                temperature,
                retry_base_delay: Duration::from_millis(base_delay_ms),
                deadline,
            },
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, default_model: String) -> Self {
        Self {
            api_key,
            default_model,
            host: "127.0.0.1".to_string(),
            port: 3000,
            plan: PlanConfig::default(),
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))
}
