//! Email delivery.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use mallhub_core::config::EmailConfig;
use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;

/// Sends email.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Deliver one message.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;

    /// Deliver a password-reset link.
    async fn send_forgot_password(&self, to: &str, link: &str) -> AppResult<()> {
        let body = format!(
            "Someone asked to reset the password of your account.\n\n\
             Open the link below within 30 minutes to choose a new one:\n{link}\n\n\
             If this was not you, ignore this email."
        );
        self.send(to, "Reset your password", &body).await
    }
}

/// Writes every message to the log instead of sending it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        info!(from = %self.from, to, subject, body, "Email (log provider)");
        Ok(())
    }
}

/// JSON payload accepted by the HTTP mail API.
#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts messages to an HTTP mail API.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AppError::configuration(
                "email.endpoint is required for the http provider",
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build mail client", e)
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let payload = MailPayload {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "failed to send email", e)
            })?;

        debug!(to, subject, "Email sent");
        Ok(())
    }
}
