//! Outbound email and SMS provider configuration.

use serde::{Deserialize, Serialize};

/// Email provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Provider: `"log"` (writes to the tracing log) or `"http"` (JSON API).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Endpoint of the HTTP mail API.
    #[serde(default)]
    pub endpoint: String,
    /// API key sent as a bearer token to the HTTP mail API.
    #[serde(default)]
    pub api_key: String,
    /// Sender address.
    #[serde(default = "default_from")]
    pub from: String,
    /// Public URL of the password reset page; the code is appended.
    #[serde(default = "default_reset_url")]
    pub reset_password_url: String,
    /// Upper bound on one delivery attempt, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: String::new(),
            api_key: String::new(),
            from: default_from(),
            reset_password_url: default_reset_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// SMS provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelephoneConfig {
    /// Provider: `"log"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Endpoint of the HTTP SMS gateway.
    #[serde(default)]
    pub endpoint: String,
    /// API key sent as a bearer token to the gateway.
    #[serde(default)]
    pub api_key: String,
    /// Template id for registration codes.
    #[serde(default = "default_register_template")]
    pub register_template: String,
    /// Template id for identity verification codes.
    #[serde(default = "default_auth_template")]
    pub auth_template: String,
    /// Template id for password reset codes.
    #[serde(default = "default_reset_template")]
    pub reset_password_template: String,
    /// Upper bound on one delivery attempt, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for TelephoneConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: String::new(),
            api_key: String::new(),
            register_template: default_register_template(),
            auth_template: default_auth_template(),
            reset_password_template: default_reset_template(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from() -> String {
    "no-reply@mallhub.local".to_string()
}

fn default_reset_url() -> String {
    "http://localhost:8080/reset-password?code=".to_string()
}

fn default_register_template() -> String {
    "SMS_REGISTER".to_string()
}

fn default_auth_template() -> String {
    "SMS_AUTH".to_string()
}

fn default_reset_template() -> String {
    "SMS_RESET_PASSWORD".to_string()
}

fn default_timeout() -> u64 {
    10
}
