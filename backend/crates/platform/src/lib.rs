//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-signed tokens, Base64)
//! - Password hashing (Argon2id) and one-time password generation
//! - Cookie and client fingerprint helpers
//! - Outbound mail transports

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod mail;
pub mod password;
