//! One-shot flash messages
//!
//! Messages ride in a signed cookie until the next page that shows
//! them, which also clears the cookie. A tampered or unreadable cookie
//! reads as no messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Cookie value: signed base64url JSON
pub fn encode(secret: &[u8; 32], messages: &[FlashMessage]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    platform::crypto::sign(secret, &platform::crypto::to_base64_url(&json))
}

pub fn decode(secret: &[u8; 32], cookie: &str) -> Vec<FlashMessage> {
    platform::crypto::unsign(secret, cookie)
        .and_then(|payload| platform::crypto::from_base64_url(&payload).ok())
        .and_then(|json| serde_json::from_slice(&json).ok())
        .unwrap_or_default()
}
