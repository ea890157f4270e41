//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the email-drafting LLM.
//! It implements the `CompletionService` port from the `core` crate against any
//! OpenAI-compatible chat-completion endpoint (Groq by default).

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use email_assistant_core::ports::{CompletionOptions, CompletionService, PortError, PortResult};
use tracing::{debug, error};

/// Defaults applied when a call does not override them.
#[derive(Debug, Clone)]
pub struct CompletionDefaults {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The settings one call actually runs with.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedOptions<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionDefaults {
    /// Per-call overrides win; temperature is clamped into 0.0..=1.0.
    fn resolve<'a>(&'a self, options: &'a CompletionOptions) -> ResolvedOptions<'a> {
        ResolvedOptions {
            model: options.model.as_deref().unwrap_or(&self.model),
            temperature: options
                .temperature
                .unwrap_or(self.temperature)
                .clamp(0.0, 1.0),
            max_tokens: options.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    defaults: CompletionDefaults,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    ///
    /// Fails with `PortError::Configuration` when no API key is available, so the
    /// problem surfaces at startup instead of on the first request.
    pub fn new(
        api_key: Option<&str>,
        api_base: &str,
        defaults: CompletionDefaults,
    ) -> PortResult<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PortError::Configuration("GROQ_API_KEY is required".to_string()))?;

        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Ok(Self {
            client: Client::with_config(config),
            defaults,
        })
    }

    fn build_messages(
        prompt: &str,
        system_message: Option<&str>,
    ) -> PortResult<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(2);

        if let Some(system) = system_message.filter(|s| !s.trim().is_empty()) {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ));
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        ));

        Ok(messages)
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    /// Sends the prompt and returns the content of the first choice.
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> PortResult<String> {
        let ResolvedOptions {
            model,
            temperature,
            max_tokens,
        } = self.defaults.resolve(options);

        let messages = Self::build_messages(prompt, options.system_message.as_deref())?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .max_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(model, temperature, prompt_chars = prompt.len(), "Requesting completion");

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| {
                error!("Completion request failed: {}", e);
                PortError::Provider(format!("Failed to get response from completion API: {}", e))
            })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Provider("Completion API returned no text content.".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> CompletionDefaults {
        CompletionDefaults {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = OpenAiCompletionAdapter::new(None, "https://api.groq.com/openai/v1", defaults())
            .err()
            .expect("adapter must not build without a key");
        assert!(matches!(err, PortError::Configuration(_)));

        let blank = OpenAiCompletionAdapter::new(Some("  "), "https://api.groq.com/openai/v1", defaults());
        assert!(matches!(blank, Err(PortError::Configuration(_))));
    }

    #[test]
    fn adapter_builds_with_a_key() {
        assert!(OpenAiCompletionAdapter::new(Some("gsk_test"), "http://localhost:1/v1", defaults()).is_ok());
    }

    #[test]
    fn defaults_apply_when_nothing_is_overridden() {
        let defaults = defaults();
        let options = CompletionOptions::default();
        assert_eq!(
            defaults.resolve(&options),
            ResolvedOptions {
                model: "llama-3.1-8b-instant",
                temperature: 0.7,
                max_tokens: 1024,
            }
        );
    }

    #[test]
    fn overrides_win_and_temperature_is_clamped() {
        let defaults = defaults();
        let hot = CompletionOptions {
            model: Some("llama-3.3-70b-versatile".to_string()),
            temperature: Some(1.7),
            max_tokens: Some(256),
            system_message: None,
        };
        let resolved = defaults.resolve(&hot);
        assert_eq!(resolved.model, "llama-3.3-70b-versatile");
        assert_eq!(resolved.temperature, 1.0);
        assert_eq!(resolved.max_tokens, 256);

        let cold = CompletionOptions {
            temperature: Some(-0.2),
            ..CompletionOptions::default()
        };
        assert_eq!(defaults.resolve(&cold).temperature, 0.0);
    }

    #[test]
    fn system_message_goes_first() {
        let messages = OpenAiCompletionAdapter::build_messages("Draft it", Some("You write emails")).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));

        let only_user = OpenAiCompletionAdapter::build_messages("Draft it", None).unwrap();
        assert_eq!(only_user.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_provider_error() {
        let adapter = OpenAiCompletionAdapter::new(Some("gsk_test"), "http://127.0.0.1:9/v1", defaults()).unwrap();
        let result = adapter.complete("Hello", &CompletionOptions::default()).await;
        assert!(matches!(result, Err(PortError::Provider(_))));
    }
}
