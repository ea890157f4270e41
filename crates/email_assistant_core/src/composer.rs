//! crates/email_assistant_core/src/composer.rs
//!
//! Turns an (optionally edited) generated email into a rendered message and
//! hands it to a `MailTransport`.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{error, info};

use crate::attachments::check_total_size;
use crate::domain::{Attachment, OutgoingEmail, SendOutcome, SmtpProvider, SmtpSettings};
use crate::ports::{MailTransport, PortError, PortResult};
use crate::template::{render_message, EmailTemplate};

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("address pattern is valid")
});

pub fn is_valid_email(address: &str) -> bool {
    EMAIL_ADDRESS.is_match(address)
}

/// SMTP settings that come from the deployment rather than from the user.
#[derive(Debug, Clone, Default)]
pub struct ComposerSettings {
    pub smtp_password: Option<String>,
    pub custom_host: Option<String>,
    pub custom_port: u16,
}

/// One send action as requested by the user.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub provider: SmtpProvider,
    pub template: EmailTemplate,
    pub attachments: Vec<Attachment>,
}

pub struct EmailComposer {
    transport: Arc<dyn MailTransport>,
    settings: ComposerSettings,
}

impl EmailComposer {
    pub fn new(transport: Arc<dyn MailTransport>, settings: ComposerSettings) -> Self {
        Self { transport, settings }
    }

    /// Resolves host, port and credentials for a provider.
    pub fn smtp_settings(&self, provider: SmtpProvider, sender: &str) -> PortResult<SmtpSettings> {
        let password = self
            .settings
            .smtp_password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| PortError::Configuration("SMTP_PASSWORD is not set".to_string()))?;

        let (host, port) = match provider.preset() {
            Some((host, port)) => (host.to_string(), port),
            None => {
                let host = self
                    .settings
                    .custom_host
                    .clone()
                    .filter(|h| !h.trim().is_empty())
                    .ok_or_else(|| {
                        PortError::Configuration("SMTP_HOST is required for the custom provider".to_string())
                    })?;
                (host, self.settings.custom_port)
            }
        };

        Ok(SmtpSettings {
            host,
            port,
            username: sender.to_string(),
            password,
        })
    }

    /// Validates, renders and delivers one email. All failures are folded into
    /// the returned outcome; nothing is retried.
    pub async fn send(&self, request: SendRequest) -> SendOutcome {
        let recipient = request.recipient.clone();
        match self.try_send(request).await {
            Ok(()) => {
                info!(%recipient, "Email sent");
                SendOutcome {
                    success: true,
                    message: "Email sent successfully!".to_string(),
                }
            }
            Err(e) => {
                error!(%recipient, "Failed to send email: {}", e);
                SendOutcome {
                    success: false,
                    message: format!("Failed to send email: {}", e),
                }
            }
        }
    }

    async fn try_send(&self, request: SendRequest) -> PortResult<()> {
        if !is_valid_email(&request.sender) {
            return Err(PortError::InvalidInput(format!(
                "invalid sender address '{}'",
                request.sender
            )));
        }
        if !is_valid_email(&request.recipient) {
            return Err(PortError::InvalidInput(format!(
                "invalid recipient address '{}'",
                request.recipient
            )));
        }
        if request.body.trim().is_empty() {
            return Err(PortError::InvalidInput("email body is empty".to_string()));
        }
        check_total_size(&request.attachments).map_err(|e| PortError::InvalidInput(e.to_string()))?;

        let settings = self.smtp_settings(request.provider, &request.sender)?;
        let rendered = render_message(request.template, &request.subject, &request.body, &request.sender);

        let email = OutgoingEmail {
            sender: request.sender,
            recipient: request.recipient,
            subject: request.subject,
            plain_text: rendered.plain_text,
            html: rendered.html,
            attachments: request.attachments,
        };

        self.transport.deliver(&settings, &email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(SmtpSettings, OutgoingEmail)>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, settings: &SmtpSettings, email: &OutgoingEmail) -> PortResult<()> {
            if let Some(msg) = &self.fail_with {
                return Err(PortError::Unexpected(msg.clone()));
            }
            self.sent.lock().unwrap().push((settings.clone(), email.clone()));
            Ok(())
        }
    }

    fn settings() -> ComposerSettings {
        ComposerSettings {
            smtp_password: Some("app-password".to_string()),
            custom_host: Some("smtp.example.com".to_string()),
            custom_port: 2525,
        }
    }

    fn request() -> SendRequest {
        SendRequest {
            sender: "alice@example.com".to_string(),
            recipient: "bob@example.org".to_string(),
            subject: "Friday".to_string(),
            body: "See you at 2pm.".to_string(),
            provider: SmtpProvider::Gmail,
            template: EmailTemplate::Default,
            attachments: vec![Attachment::new("agenda.txt", Some("text/plain"), b"1. Intro".to_vec())],
        }
    }

    #[test]
    fn address_validation() {
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("user@host"));
        assert!(!is_valid_email("user @example.com"));
    }

    #[tokio::test]
    async fn successful_send_renders_and_delivers() {
        let transport = Arc::new(RecordingTransport::default());
        let composer = EmailComposer::new(transport.clone(), settings());

        let outcome = composer.send(request()).await;
        assert_eq!(
            outcome,
            SendOutcome { success: true, message: "Email sent successfully!".to_string() }
        );

        let sent = transport.sent.lock().unwrap();
        let (smtp, email) = &sent[0];
        assert_eq!(smtp.host, "smtp.gmail.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.username, "alice@example.com");
        assert_eq!(email.plain_text, "Subject: Friday\n\nSee you at 2pm.\n\nSent by alice@example.com");
        assert!(email.html.contains("<p>See you at 2pm.</p>"));
        assert_eq!(email.attachments.len(), 1);
    }

    #[tokio::test]
    async fn custom_provider_uses_configured_server() {
        let transport = Arc::new(RecordingTransport::default());
        let composer = EmailComposer::new(transport.clone(), settings());

        let mut req = request();
        req.provider = SmtpProvider::Custom;
        assert!(composer.send(req).await.success);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].0.host, "smtp.example.com");
        assert_eq!(sent[0].0.port, 2525);
    }

    #[tokio::test]
    async fn missing_password_fails_before_delivery() {
        let transport = Arc::new(RecordingTransport::default());
        let composer = EmailComposer::new(
            transport.clone(),
            ComposerSettings { smtp_password: None, ..settings() },
        );

        let outcome = composer.send(request()).await;
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to send email:"));
        assert!(outcome.message.contains("SMTP_PASSWORD"));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected() {
        let transport = Arc::new(RecordingTransport::default());
        let composer = EmailComposer::new(transport.clone(), settings());

        let mut req = request();
        req.recipient = "not-an-address".to_string();
        let outcome = composer.send(req).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("not-an-address"));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_reported_with_cause() {
        let transport = Arc::new(RecordingTransport {
            fail_with: Some("535 authentication failed".to_string()),
            ..Default::default()
        });
        let composer = EmailComposer::new(transport, settings());

        let outcome = composer.send(request()).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("535 authentication failed"));
    }
}
