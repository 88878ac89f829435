//! Profile phone number: optional free text up to 32 characters

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::too_long;

pub const PHONE_NUMBER_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: &str) -> Result<Self, String> {
        let number = raw.trim();
        let length = number.chars().count();
        if length > PHONE_NUMBER_MAX_LENGTH {
            return Err(too_long(PHONE_NUMBER_MAX_LENGTH, length));
        }
        Ok(Self(number.to_string()))
    }

    pub fn from_db(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
