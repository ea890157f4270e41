//! services/api/src/adapters/smtp.rs
//!
//! This module contains the SMTP adapter for outgoing mail.
//! It implements the `MailTransport` port from the `core` crate using `lettre`.

use async_trait::async_trait;
use email_assistant_core::{
    domain::{Attachment, OutgoingEmail, SmtpSettings},
    ports::{MailTransport, PortError, PortResult},
};
use lettre::message::header::{ContentDisposition, ContentTransferEncoding, ContentType};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Sends mail over a STARTTLS relay, logging in with the sender's password.
///
/// A fresh transport is built per message because host, port and credentials
/// are chosen per send.
#[derive(Clone, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the MIME message: an alternative plain/HTML body followed by one
    /// part per attachment.
    pub fn build_message(email: &OutgoingEmail) -> PortResult<Message> {
        let from: Mailbox = email
            .sender
            .parse()
            .map_err(|e| PortError::InvalidInput(format!("invalid sender address: {}", e)))?;
        let to: Mailbox = email
            .recipient
            .parse()
            .map_err(|e| PortError::InvalidInput(format!("invalid recipient address: {}", e)))?;

        let alternative = MultiPart::alternative()
            .singlepart(SinglePart::plain(email.plain_text.clone()))
            .singlepart(SinglePart::html(email.html.clone()));

        let mut body = MultiPart::mixed().multipart(alternative);
        for attachment in &email.attachments {
            body = body.singlepart(attachment_part(attachment)?);
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(body)
            .map_err(|e| PortError::Unexpected(format!("failed to build message: {}", e)))
    }
}

/// Text attachments that are valid UTF-8 travel as quoted-printable text; all
/// other content is base64 encoded.
fn attachment_part(attachment: &Attachment) -> PortResult<SinglePart> {
    let content_type = ContentType::parse(&attachment.content_type)
        .or_else(|_| ContentType::parse("application/octet-stream"))
        .map_err(|e| PortError::Unexpected(format!("invalid content type: {}", e)))?;

    let encoding = match (attachment.main_type(), std::str::from_utf8(&attachment.data)) {
        ("text", Ok(_)) => ContentTransferEncoding::QuotedPrintable,
        _ => ContentTransferEncoding::Base64,
    };

    Ok(SinglePart::builder()
        .header(content_type)
        .header(ContentDisposition::attachment(&attachment.name))
        .header(encoding)
        .body(attachment.data.clone()))
}

//=========================================================================================
// `MailTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, settings: &SmtpSettings, email: &OutgoingEmail) -> PortResult<()> {
        let message = Self::build_message(email)?;

        let creds = Credentials::new(settings.username.clone(), settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| PortError::Unexpected(format!("failed to create SMTP transport: {}", e)))?
            .port(settings.port)
            .credentials(creds)
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| PortError::Unexpected(format!("SMTP delivery failed: {}", e)))?;

        info!(
            host = %settings.host,
            attachments = email.attachments.len(),
            "Delivered email to {}",
            email.recipient
        );
        Ok(())
    }
}
