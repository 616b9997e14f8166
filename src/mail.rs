//! Outgoing notification mail. Delivery is handed to an HTTP relay; the
//! application only cares whether the relay accepted the message.

use crate::config::Config;
use axum::async_trait;
use serde::Serialize;
use std::{sync::Arc, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail delivery is not configured")]
    Disabled,
    #[error("failed to reach the mail relay: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay rejected the message with status {0}")]
    Rejected(reqwest::StatusCode),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &Message) -> Result<(), MailError>;
}

/// Upper bound for one relay round trip, so a hung relay cannot hold a
/// request open.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts messages as JSON to `MAIL_API_URL`.
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
}

impl HttpMailer {
    pub fn new(url: String, timeout: Duration) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &Message) -> Result<(), MailError> {
        let res = self.client.post(&self.url).json(message).send().await?;

        if !res.status().is_success() {
            return Err(MailError::Rejected(res.status()));
        }

        Ok(())
    }
}

/// Used when no relay is configured; every send fails.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _message: &Message) -> Result<(), MailError> {
        Err(MailError::Disabled)
    }
}

pub fn from_config(config: &Config) -> Arc<dyn Mailer> {
    match &config.mail_api_url {
        Some(url) => match HttpMailer::new(url.clone(), RELAY_TIMEOUT) {
            Ok(mailer) => {
                info!("sending mail through {url}");
                Arc::new(mailer)
            }
            Err(err) => {
                error!("failed to build mail client, mail delivery is disabled: {err}");
                Arc::new(DisabledMailer)
            }
        },
        None => {
            warn!("MAIL_API_URL is not set, mail delivery is disabled");
            Arc::new(DisabledMailer)
        }
    }
}
