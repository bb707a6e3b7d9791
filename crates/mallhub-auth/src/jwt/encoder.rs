//! JWT token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use mallhub_core::config::AuthConfig;
use mallhub_core::error::{AppError, ErrorKind};

use super::claims::{Claims, Role};

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl_hours: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// Expiration as an RFC 3339 timestamp.
    pub expires_at: String,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_hours: i64::try_from(config.token_ttl_hours).unwrap_or(i64::MAX / 3600),
        }
    }

    /// Signs a token for `subject` with the given role.
    pub fn issue(&self, subject: Uuid, role: Role) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let exp: DateTime<Utc> = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: subject,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Unknown, "Failed to sign token", e)
        })?;

        debug!(subject = %subject, role = ?role, "Issued token");
        Ok(IssuedToken {
            token,
            expires_at: mallhub_core::types::format_timestamp(&exp),
        })
    }
}
