//! Client identification from request headers

use std::net::IpAddr;

use axum::http::{HeaderMap, header};

use crate::crypto::sha256;

/// Hash of the User-Agent a session was created from
///
/// A session presented by a different User-Agent is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFingerprint {
    pub hash: [u8; 32],
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    /// A missing User-Agent hashes as the empty string
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let hash = sha256(user_agent.as_deref().unwrap_or_default().as_bytes());
        Self { hash, user_agent }
    }

    pub fn hash_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }
}

/// First address in X-Forwarded-For, else the peer address
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or(direct_ip)
}
