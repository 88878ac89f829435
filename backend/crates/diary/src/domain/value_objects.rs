//! Domain Value Objects

use serde::{Deserialize, Serialize};

/// Whether the daily check was done; `no` unless stated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyCheck {
    Yes,
    #[default]
    No,
}

impl DailyCheck {
    pub const CHOICES: [&'static str; 2] = ["yes", "no"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DailyCheck::Yes => "yes",
            DailyCheck::No => "no",
        }
    }

    /// Parse a submitted choice; blank means the default
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "" | "no" => Ok(DailyCheck::No),
            "yes" => Ok(DailyCheck::Yes),
            other => Err(format!(
                "Select a valid choice. {other} is not one of the available choices."
            )),
        }
    }

    /// Stored values are constrained by the schema
    pub fn from_db(raw: &str) -> Self {
        if raw == "yes" {
            DailyCheck::Yes
        } else {
            DailyCheck::No
        }
    }
}
