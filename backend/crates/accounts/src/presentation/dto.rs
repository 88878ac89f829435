//! API DTOs (Data Transfer Objects)
//!
//! Requests arrive as urlencoded forms whose field names match the keys
//! of the field errors sent back on 422.

use serde::{Deserialize, Serialize};

use crate::presentation::flash::FlashMessage;

// ============================================================================
// Form descriptions (GET on a form route)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FieldDescription {
    pub name: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

impl FieldDescription {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            help: None,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            help: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormDescription {
    pub action: String,
    pub fields: Vec<FieldDescription>,
}

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpMethod {
    pub name: &'static str,
    pub url: &'static str,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Checkbox: present ("on") when ticked
    pub remember_me: Option<String>,
}

impl LoginForm {
    pub fn remember_me(&self) -> bool {
        self.remember_me
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "off")
    }
}

/// Login values echoed back; the password never is
#[derive(Debug, Clone, Serialize)]
pub struct LoginValues {
    pub username: String,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

// ============================================================================
// Passwords
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordResetForm {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordResetConfirmForm {
    pub new_password1: String,
    pub new_password2: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeResponse {
    pub message: &'static str,
}

// ============================================================================
// Index
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub authenticated: bool,
    pub user_name: Option<String>,
    pub departments: Vec<String>,
    pub active_role: Option<String>,
    pub messages: Vec<FlashMessage>,
}
