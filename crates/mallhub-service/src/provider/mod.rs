//! Outbound email and SMS collaborators.
//!
//! Both are chosen from configuration at startup and injected into the
//! services that deliver one-time codes.

pub mod email;
pub mod telephone;

use std::sync::Arc;

use mallhub_core::config::{EmailConfig, TelephoneConfig};
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;

pub use email::{HttpMailer, LogMailer, Mailer};
pub use telephone::{HttpTelephone, LogTelephone, SmsTemplates, Telephone};

/// Build the configured mailer.
pub fn build_mailer(config: &EmailConfig) -> AppResult<Arc<dyn Mailer>> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogMailer::new(config))),
        "http" => Ok(Arc::new(HttpMailer::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Invalid email provider '{other}'. Supported: log, http"
        ))),
    }
}

/// Build the configured SMS sender.
pub fn build_telephone(config: &TelephoneConfig) -> AppResult<Arc<dyn Telephone>> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogTelephone::new(config))),
        "http" => Ok(Arc::new(HttpTelephone::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Invalid telephone provider '{other}'. Supported: log, http"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallhub_core::error::ErrorKind;

    #[test]
    fn test_unknown_providers_are_configuration_errors() {
        let email = EmailConfig {
            provider: "carrier-pigeon".into(),
            ..EmailConfig::default()
        };
        assert!(build_mailer(&email).unwrap_err().is(ErrorKind::Configuration));

        let phone = TelephoneConfig {
            provider: "aliyun".into(),
            ..TelephoneConfig::default()
        };
        assert!(build_telephone(&phone).unwrap_err().is(ErrorKind::Configuration));
    }

    #[test]
    fn test_http_provider_requires_endpoint() {
        let email = EmailConfig {
            provider: "http".into(),
            ..EmailConfig::default()
        };
        assert!(build_mailer(&email).unwrap_err().is(ErrorKind::Configuration));
    }

    #[test]
    fn test_log_providers_build() {
        assert!(build_mailer(&EmailConfig::default()).is_ok());
        assert!(build_telephone(&TelephoneConfig::default()).is_ok());
    }
}
