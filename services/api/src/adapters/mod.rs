pub mod completion_llm;
pub mod smtp;

pub use completion_llm::{CompletionDefaults, OpenAiCompletionAdapter};
pub use smtp::SmtpMailer;
