//! Mail transports

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;

use super::{MailError, Mailer, OutgoingMail, ensure_recipients};

const CONNECT_TIMEOUT_SECS: u64 = 5;
const TOTAL_TIMEOUT_SECS: u64 = 15;

/// Writes messages to the log instead of delivering them
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        ensure_recipients(mail)?;
        tracing::info!(
            from = %mail.from,
            to = ?mail.to,
            subject = %mail.subject,
            "\n{}",
            mail.body
        );
        Ok(())
    }
}

/// Posts messages as JSON to an HTTP mail relay
#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    client: Client,
    endpoint: String,
}

impl HttpRelayMailer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, MailError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .build()
            .map_err(|e| MailError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Mailer for HttpRelayMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        ensure_recipients(mail)?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(mail)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }

        tracing::debug!(to = ?mail.to, "Mail handed to relay");
        Ok(())
    }
}

/// Records messages in memory; can be switched to fail every send
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<OutgoingMail>>>,
    failing: Arc<Mutex<bool>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with a transport error
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.set_failing(true);
        mailer
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(|e| e.into_inner()) = failing;
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Mailer for MemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        ensure_recipients(mail)?;
        if *self.failing.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(mail.clone());
        Ok(())
    }
}

/// Runtime-selected transport
#[derive(Debug, Clone)]
pub enum AnyMailer {
    Console(ConsoleMailer),
    Relay(HttpRelayMailer),
    Memory(MemoryMailer),
}

impl AnyMailer {
    /// Relay when an endpoint is configured, console otherwise
    pub fn from_relay_url(url: Option<&str>) -> Result<Self, MailError> {
        match url {
            Some(url) if !url.trim().is_empty() => Ok(Self::Relay(HttpRelayMailer::new(url)?)),
            _ => Ok(Self::Console(ConsoleMailer)),
        }
    }
}

impl Mailer for AnyMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        match self {
            AnyMailer::Console(m) => m.send(mail).await,
            AnyMailer::Relay(m) => m.send(mail).await,
            AnyMailer::Memory(m) => m.send(mail).await,
        }
    }
}
