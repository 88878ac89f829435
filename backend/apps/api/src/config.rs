//! Server configuration from the environment

use std::env;
use std::net::SocketAddr;

use accounts::AccountsConfig;
use anyhow::{Context, bail};
use diary::DiaryConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Unset: mail goes to the log
    pub mail_relay_url: Option<String>,
    pub accounts: AccountsConfig,
    pub diary: DiaryConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `development` allows a random session secret and insecure cookies
    pub fn from_lookup<F>(lookup: F, development: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins = split_list(
            &var("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
        );

        let mut accounts = if development {
            AccountsConfig::development()
        } else {
            AccountsConfig::default()
        };

        match var("SESSION_SECRET") {
            Some(secret_b64) => accounts.session_secret = decode_secret(&secret_b64)?,
            None if development => {}
            None => bail!("SESSION_SECRET must be set in production"),
        }

        accounts.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);
        if let Some(list) = var("EMAIL_ENDSWITH") {
            accounts.email_endswith = split_list(&list);
        }
        if let Some(list) = var("EMAIL_CANT_ENDSWITH") {
            accounts.email_cant_endswith = split_list(&list);
        }
        if let Some(from) = var("DEFAULT_FROM_EMAIL") {
            accounts.default_from_email = from;
        }
        if let Some(site) = var("SITE_NAME") {
            accounts.site_name = site;
        }

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            mail_relay_url: var("MAIL_RELAY_URL"),
            accounts,
            diary: DiaryConfig::default(),
        })
    }
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = platform::crypto::from_base64(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| {
            anyhow::anyhow!("SESSION_SECRET must be 32 bytes, got {}", bytes.len())
        })
}

/// Comma-separated list, blanks dropped
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
