//! Outbound mail
//!
//! Sending is never best-effort: every transport returns an error the
//! caller must handle before it commits anything that depends on the
//! message having gone out.

use serde::Serialize;
use thiserror::Error;

mod transport;

pub use transport::{AnyMailer, ConsoleMailer, HttpRelayMailer, MemoryMailer};

/// A plain-text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Message has no recipients")]
    NoRecipients,

    #[error("Mail relay rejected the message with status {0}")]
    Rejected(u16),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// A mail transport
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

pub(crate) fn ensure_recipients(mail: &OutgoingMail) -> Result<(), MailError> {
    if mail.to.iter().all(|to| to.trim().is_empty()) {
        return Err(MailError::NoRecipients);
    }
    Ok(())
}
