//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// 32 random bytes, e.g. a development session secret
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as URL-safe base64 without padding
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding
pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Decode standard base64 (environment-supplied secrets)
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

fn mac_for(secret: &[u8; 32], value: &str) -> HmacSha256 {
    // Keys of any length are accepted; 32 bytes can never fail.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(value.as_bytes());
    mac
}

/// Sign `value` as `value.signature`
pub fn sign(secret: &[u8; 32], value: &str) -> String {
    let signature = mac_for(secret, value).finalize().into_bytes();
    format!("{}.{}", value, to_base64_url(&signature))
}

/// Verify a token produced by [`sign`] and return the signed value
///
/// The signature comparison is constant-time.
pub fn unsign(secret: &[u8; 32], token: &str) -> Option<String> {
    let (value, signature_b64) = token.rsplit_once('.')?;
    let signature = from_base64_url(signature_b64).ok()?;
    mac_for(secret, value).verify_slice(&signature).ok()?;
    Some(value.to_string())
}
