//! crates/email_assistant_core/src/attachments.rs
//!
//! Size and uniqueness rules for the files a user attaches while composing.

use crate::domain::Attachment;

pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_TOTAL_ATTACHMENT_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("{name} exceeds the 10MB per-file limit ({size} bytes)")]
    TooLarge { name: String, size: usize },
    #[error("Adding {name} would exceed the 25MB total attachment limit")]
    TotalTooLarge { name: String },
    #[error("{0} is already attached")]
    Duplicate(String),
}

/// The attachments of one compose session, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSet {
    items: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attachment: Attachment) -> Result<(), AttachmentError> {
        let size = attachment.size();
        if size > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                name: attachment.name,
                size,
            });
        }
        if self.items.iter().any(|a| a.name == attachment.name) {
            return Err(AttachmentError::Duplicate(attachment.name));
        }
        if self.total_size() + size > MAX_TOTAL_ATTACHMENT_BYTES {
            return Err(AttachmentError::TotalTooLarge {
                name: attachment.name,
            });
        }
        self.items.push(attachment);
        Ok(())
    }

    /// Adds every attachment or none of them.
    pub fn add_all(&mut self, attachments: Vec<Attachment>) -> Result<(), AttachmentError> {
        let mut staged = self.clone();
        for attachment in attachments {
            staged.add(attachment)?;
        }
        *self = staged;
        Ok(())
    }

    /// Removes the attachment with the given name. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.name != name);
        self.items.len() != before
    }

    pub fn total_size(&self) -> usize {
        self.items.iter().map(Attachment::size).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<Attachment> {
        self.items.clone()
    }
}

/// Checks the aggregate limit for a list assembled outside an [`AttachmentSet`].
pub fn check_total_size(attachments: &[Attachment]) -> Result<(), AttachmentError> {
    let total: usize = attachments.iter().map(Attachment::size).sum();
    match attachments.last() {
        Some(last) if total > MAX_TOTAL_ATTACHMENT_BYTES => Err(AttachmentError::TotalTooLarge {
            name: last.name.clone(),
        }),
        _ => Ok(()),
    }
}
