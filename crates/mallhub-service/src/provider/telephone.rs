//! SMS delivery.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use mallhub_core::config::TelephoneConfig;
use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;

/// Template ids for each kind of SMS code.
#[derive(Debug, Clone)]
pub struct SmsTemplates {
    pub register: String,
    pub auth: String,
    pub reset_password: String,
}

impl SmsTemplates {
    pub fn new(config: &TelephoneConfig) -> Self {
        Self {
            register: config.register_template.clone(),
            auth: config.auth_template.clone(),
            reset_password: config.reset_password_template.clone(),
        }
    }
}

fn code_params(code: &str) -> HashMap<String, String> {
    HashMap::from([("code".to_string(), code.to_string())])
}

/// Sends templated SMS messages.
#[async_trait]
pub trait Telephone: Send + Sync + std::fmt::Debug {
    /// Template ids this sender uses.
    fn templates(&self) -> &SmsTemplates;

    /// Send `template_id` to `phone`, filled with `params`.
    async fn send(
        &self,
        phone: &str,
        template_id: &str,
        params: &HashMap<String, String>,
    ) -> AppResult<()>;

    /// Send a registration code.
    async fn send_register_code(&self, phone: &str, code: &str) -> AppResult<()> {
        let template = self.templates().register.clone();
        self.send(phone, &template, &code_params(code)).await
    }

    /// Send an identity verification code.
    async fn send_auth_code(&self, phone: &str, code: &str) -> AppResult<()> {
        let template = self.templates().auth.clone();
        self.send(phone, &template, &code_params(code)).await
    }

    /// Send a password-reset code.
    async fn send_reset_password_code(&self, phone: &str, code: &str) -> AppResult<()> {
        let template = self.templates().reset_password.clone();
        self.send(phone, &template, &code_params(code)).await
    }
}

/// Writes every SMS to the log instead of sending it.
#[derive(Debug, Clone)]
pub struct LogTelephone {
    templates: SmsTemplates,
}

impl LogTelephone {
    pub fn new(config: &TelephoneConfig) -> Self {
        Self {
            templates: SmsTemplates::new(config),
        }
    }
}

#[async_trait]
impl Telephone for LogTelephone {
    fn templates(&self) -> &SmsTemplates {
        &self.templates
    }

    async fn send(
        &self,
        phone: &str,
        template_id: &str,
        params: &HashMap<String, String>,
    ) -> AppResult<()> {
        info!(phone, template_id, ?params, "SMS (log provider)");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SmsPayload<'a> {
    phone: &'a str,
    template: &'a str,
    params: &'a HashMap<String, String>,
}

/// Posts messages to an HTTP SMS gateway.
#[derive(Debug, Clone)]
pub struct HttpTelephone {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    templates: SmsTemplates,
}

impl HttpTelephone {
    pub fn new(config: &TelephoneConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AppError::configuration(
                "telephone.endpoint is required for the http provider",
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build SMS client", e)
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            templates: SmsTemplates::new(config),
        })
    }
}

#[async_trait]
impl Telephone for HttpTelephone {
    fn templates(&self) -> &SmsTemplates {
        &self.templates
    }

    async fn send(
        &self,
        phone: &str,
        template_id: &str,
        params: &HashMap<String, String>,
    ) -> AppResult<()> {
        let payload = SmsPayload {
            phone,
            template: template_id,
            params,
        };

        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "failed to send SMS", e)
            })?;

        debug!(phone, template_id, "SMS sent");
        Ok(())
    }
}
