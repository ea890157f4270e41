//! crates/email_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Prompt Inputs
//=========================================================================================

/// The stylistic register requested for a generated email.
///
/// The first five variants are the labels offered to users. Any other label is
/// kept verbatim in `Other` so callers can experiment without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToneLabel {
    #[default]
    Professional,
    Friendly,
    Formal,
    Casual,
    Urgent,
    Other(String),
}

impl ToneLabel {
    /// The labels a client is expected to offer.
    pub const OFFERED: [ToneLabel; 5] = [
        ToneLabel::Professional,
        ToneLabel::Friendly,
        ToneLabel::Formal,
        ToneLabel::Casual,
        ToneLabel::Urgent,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ToneLabel::Professional => "professional",
            ToneLabel::Friendly => "friendly",
            ToneLabel::Formal => "formal",
            ToneLabel::Casual => "casual",
            ToneLabel::Urgent => "urgent",
            ToneLabel::Other(label) => label,
        }
    }
}

impl fmt::Display for ToneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "" | "professional" => ToneLabel::Professional,
            "friendly" => ToneLabel::Friendly,
            "formal" => ToneLabel::Formal,
            "casual" => ToneLabel::Casual,
            "urgent" => ToneLabel::Urgent,
            _ => ToneLabel::Other(trimmed.to_string()),
        })
    }
}

/// Selects the phrasing variant used when building a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmailType {
    #[default]
    Custom,
    ThankYou,
    NewArticle,
    ReportSharing,
    MeetingFollowup,
    ProjectUpdate,
}

impl EmailType {
    pub const ALL: [EmailType; 6] = [
        EmailType::Custom,
        EmailType::ThankYou,
        EmailType::NewArticle,
        EmailType::ReportSharing,
        EmailType::MeetingFollowup,
        EmailType::ProjectUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::Custom => "custom",
            EmailType::ThankYou => "thank_you",
            EmailType::NewArticle => "new_article",
            EmailType::ReportSharing => "report_sharing",
            EmailType::MeetingFollowup => "meeting_followup",
            EmailType::ProjectUpdate => "project_update",
        }
    }

    /// Parses a type key, falling back to `Custom` for anything unrecognised.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(key.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to build a prompt for one email.
#[derive(Debug, Clone, Default)]
pub struct EmailRequest {
    pub key_points: Vec<String>,
    pub tone: ToneLabel,
    pub context: Option<String>,
    pub email_type: EmailType,
}

/// Splits a free-text block into key points, one per non-blank line.
pub fn parse_key_points(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

//=========================================================================================
// Evaluation
//=========================================================================================

/// The heuristic diagnostics computed for a generated email.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub all_key_points_included: bool,
    pub found_points: Vec<String>,
    pub missing_points: Vec<String>,
    /// Share of key points found, in percent. 100 when there are no key points.
    pub coverage_percent: f64,
    pub tone_is_polite: bool,
    pub polite_count: usize,
    pub impolite_count: usize,
    pub has_greeting: bool,
    pub has_closing: bool,
    pub word_count: usize,
    pub suggestions: Vec<String>,
}

impl EvaluationResult {
    /// True when the email covers every key point and reads as polite.
    pub fn passed(&self) -> bool {
        self.all_key_points_included && self.tone_is_polite
    }
}

//=========================================================================================
// Outgoing Mail
//=========================================================================================

/// A file attached to a compose session.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub added_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, data: Vec<u8>) -> Self {
        let content_type = content_type
            .filter(|ct| ct.contains('/'))
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            name: name.into(),
            content_type,
            data,
            added_at: Utc::now(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The top-level MIME type, e.g. `text` for `text/csv`.
    pub fn main_type(&self) -> &str {
        self.content_type
            .split_once('/')
            .map(|(main, _)| main)
            .unwrap_or("application")
    }
}

/// Named SMTP presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpProvider {
    #[default]
    Gmail,
    Outlook,
    Yahoo,
    Custom,
}

impl SmtpProvider {
    pub const ALL: [SmtpProvider; 4] = [
        SmtpProvider::Gmail,
        SmtpProvider::Outlook,
        SmtpProvider::Yahoo,
        SmtpProvider::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SmtpProvider::Gmail => "gmail",
            SmtpProvider::Outlook => "outlook",
            SmtpProvider::Yahoo => "yahoo",
            SmtpProvider::Custom => "custom",
        }
    }

    /// Parses a provider name, falling back to Gmail for anything unrecognised.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "outlook" => SmtpProvider::Outlook,
            "yahoo" => SmtpProvider::Yahoo,
            "custom" => SmtpProvider::Custom,
            _ => SmtpProvider::Gmail,
        }
    }

    /// The fixed host and port for the preset providers. `Custom` has none.
    pub fn preset(&self) -> Option<(&'static str, u16)> {
        match self {
            SmtpProvider::Gmail => Some(("smtp.gmail.com", 587)),
            SmtpProvider::Outlook => Some(("smtp-mail.outlook.com", 587)),
            SmtpProvider::Yahoo => Some(("smtp.mail.yahoo.com", 587)),
            SmtpProvider::Custom => None,
        }
    }
}

/// Where and how to connect when delivering a message.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// A fully rendered message, ready to hand to a transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub plain_text: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

/// The result of a send attempt, phrased for display to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}
