pub mod attachments;
pub mod composer;
pub mod domain;
pub mod evaluation;
pub mod ports;
pub mod prompt;
pub mod template;

pub use attachments::{AttachmentError, AttachmentSet};
pub use composer::{ComposerSettings, EmailComposer, SendRequest};
pub use domain::{
    Attachment, EmailRequest, EmailType, EvaluationResult, OutgoingEmail, SendOutcome, SmtpProvider,
    SmtpSettings, ToneLabel,
};
pub use evaluation::evaluate;
pub use ports::{CompletionOptions, CompletionService, MailTransport, PortError, PortResult};
pub use prompt::build_prompt;
pub use template::{EmailTemplate, RenderedEmail};
