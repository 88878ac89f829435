//! First/last name: optional free text up to 150 characters

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::too_long;

pub const PERSON_NAME_MAX_LENGTH: usize = 150;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: &str) -> Result<Self, String> {
        let name = raw.trim();
        let length = name.chars().count();
        if length > PERSON_NAME_MAX_LENGTH {
            return Err(too_long(PERSON_NAME_MAX_LENGTH, length));
        }
        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
