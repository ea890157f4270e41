//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    /// Optional at load time; the completion adapter refuses to start without it.
    pub groq_api_key: Option<String>,
    pub completion_api_base: String,
    pub completion_model: String,
    pub completion_temperature: f32,
    pub completion_max_tokens: u32,
    pub smtp_password: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    /// Compose sessions older than this are dropped.
    pub session_ttl_minutes: i64,
    pub max_sessions: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load Completion Provider Settings ---
        let groq_api_key = non_empty_var("GROQ_API_KEY");
        let completion_api_base =
            std::env::var("COMPLETION_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let completion_model =
            std::env::var("COMPLETION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let completion_temperature =
            check_temperature(parse_var("COMPLETION_TEMPERATURE", 0.7f32)?)?;
        let completion_max_tokens = parse_var("COMPLETION_MAX_TOKENS", 1024u32)?;

        // --- Load SMTP Settings ---
        let smtp_password = non_empty_var("SMTP_PASSWORD");
        let smtp_host = non_empty_var("SMTP_HOST");
        let smtp_port = parse_var("SMTP_PORT", 587u16)?;

        // --- Load Session Limits ---
        let session_ttl_minutes = parse_var("SESSION_TTL_MINUTES", DEFAULT_SESSION_TTL_MINUTES)?;
        if session_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_MINUTES".to_string(),
                "must be a positive number of minutes".to_string(),
            ));
        }
        let max_sessions = parse_var("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?;

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            groq_api_key,
            completion_api_base,
            completion_model,
            completion_temperature,
            completion_max_tokens,
            smtp_password,
            smtp_host,
            smtp_port,
            session_ttl_minutes,
            max_sessions,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(name, std::env::var(name).ok().as_deref(), default)
}

fn parse_value<T>(name: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn check_temperature(value: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue(
            "COMPLETION_TEMPERATURE".to_string(),
            format!("{} is outside 0.0..=1.0", value),
        ))
    }
}
