//! services/api/src/error.rs
//!
//! Startup and serving failures of the email assistant service.

use crate::config::ConfigError;
use email_assistant_core::ports::PortError;

/// Everything that can stop the service from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An adapter refused to start, e.g. the completion client without an API key.
    #[error("Adapter error: {0}")]
    Port(#[from] PortError),

    /// Binding the listener or serving connections failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Startup error: {0}")]
    Internal(String),
}
