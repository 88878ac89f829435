//! User Name Value Object
//!
//! 1 to 150 characters of letters, digits and `@ . + - _`, NFKC
//! normalized. Case is preserved and significant.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::{REQUIRED, too_long};

pub const USER_NAME_MAX_LENGTH: usize = 150;

pub const INVALID_USER_NAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

pub const USER_NAME_TAKEN: &str = "A user with that username already exists.";

const ALLOWED_SPECIAL_CHARS: &[char] = &['@', '.', '+', '-', '_'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: &str) -> Result<Self, String> {
        let normalized: String = raw.trim().nfkc().collect();

        if normalized.is_empty() {
            return Err(REQUIRED.to_string());
        }

        let length = normalized.chars().count();
        if length > USER_NAME_MAX_LENGTH {
            return Err(too_long(USER_NAME_MAX_LENGTH, length));
        }

        if !normalized
            .chars()
            .all(|c| c.is_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&c))
        {
            return Err(INVALID_USER_NAME.to_string());
        }

        Ok(Self(normalized))
    }

    /// Value read back from storage
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        assert_eq!(UserName::new("alice").unwrap().as_str(), "alice");
        assert_eq!(UserName::new("Bob.Smith+ops@fw-1_a").unwrap().as_str(), "Bob.Smith+ops@fw-1_a");
        // Fullwidth letters normalize to ASCII
        assert_eq!(UserName::new("ａｌｉｃｅ").unwrap().as_str(), "alice");
        assert!(UserName::new("山田").is_ok());
    }

    #[test]
    fn test_user_name_invalid() {
        assert_eq!(UserName::new("  ").unwrap_err(), REQUIRED);
        assert_eq!(UserName::new("alice smith").unwrap_err(), INVALID_USER_NAME);
        assert_eq!(UserName::new("alice!").unwrap_err(), INVALID_USER_NAME);
        assert!(UserName::new(&"a".repeat(151)).unwrap_err().contains("at most 150"));
    }
}
