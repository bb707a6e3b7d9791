//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use mallhub_core::config::AuthConfig;
use mallhub_core::error::AppError;

use super::claims::{Claims, Role};

/// Validates bearer tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes a token and checks that it was issued for `role`.
    pub fn decode_for(&self, token: &str, role: Role) -> Result<Claims, AppError> {
        let claims = self.decode(token)?;
        if claims.role != role {
            return Err(AppError::unauthorized("permission denied"));
        }
        Ok(claims)
    }

    /// Decodes and validates a token of any role.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("invalid token signature")
                    }
                    _ => AppError::unauthorized("invalid token"),
                }
            })?;

        Ok(token_data.claims)
    }
}
