//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `MALLHUB__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section; every field has a
//! default so a missing file still yields a runnable development setup.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod notify;
pub mod redact;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::database::{DatabaseConfig, UnitOfWorkConfig};
pub use self::logging::LoggingConfig;
pub use self::notify::{EmailConfig, TelephoneConfig};
pub use self::redact::redact_credentials;
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Transaction scope settings.
    #[serde(default)]
    pub unit_of_work: UnitOfWorkConfig,
    /// TTL store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Outbound email provider.
    #[serde(default)]
    pub email: EmailConfig,
    /// Outbound SMS provider.
    #[serde(default)]
    pub telephone: TelephoneConfig,
    /// Upload storage settings.
    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// (`config/{env}`), and environment variables such as
    /// `MALLHUB__DATABASE__URL`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MALLHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_yields_defaults() {
        let config = AppConfig::load_from("does/not/exist", "test").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.provider, "memory");
        assert_eq!(config.email.provider, "log");
        assert_eq!(config.unit_of_work.timeout_seconds, 30);
    }
}
