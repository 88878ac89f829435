//! Email Value Object

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::{REQUIRED, too_long};

/// Maximum email length accepted by account forms
pub const EMAIL_MAX_LENGTH: usize = 63;

pub const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Syntactically valid email, stored as typed (trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, String> {
        let email = email.trim().to_string();

        if email.is_empty() {
            return Err(REQUIRED.to_string());
        }

        let length = email.chars().count();
        if length > EMAIL_MAX_LENGTH {
            return Err(too_long(EMAIL_MAX_LENGTH, length));
        }

        if !Self::is_valid_format(&email) {
            return Err(INVALID_EMAIL.to_string());
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if domain.contains('@') || local.is_empty() || local.chars().any(char::is_whitespace) {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }
        let domain_chars_ok = domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        let labels_ok = domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));

        domain_chars_ok && labels_ok
    }

    /// Value read back from storage
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
