//! crates/email_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the LLM provider or SMTP.

use async_trait::async_trait;
use crate::domain::{OutgoingEmail, SmtpSettings};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, SMTP).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A required setting or credential is missing. Fatal for the code path that needs it.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The completion provider failed (network, auth, quota, malformed response).
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Per-call overrides for a completion request. `None` means "use the adapter default".
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_message: Option<String>,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a single prompt (optionally preceded by a system message) and returns
    /// the text of the first choice.
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> PortResult<String>;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Delivers a rendered message using the given connection settings.
    async fn deliver(&self, settings: &SmtpSettings, email: &OutgoingEmail) -> PortResult<()>;
}
