//! Password policy for new passwords.

use mallhub_core::config::AuthConfig;
use mallhub_core::error::AppError;

/// Checks new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Returns `InvalidParams` when `password` is shorter than the minimum.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::invalid_params(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(&self, old_password: &str, new_password: &str) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::invalid_params(
                "new password must differ from the old one",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length() {
        let validator = PasswordValidator::new(&AuthConfig::default());
        assert!(validator.validate("12345").is_err());
        assert!(validator.validate("123456").is_ok());
    }

    #[test]
    fn test_not_same() {
        let validator = PasswordValidator::new(&AuthConfig::default());
        assert!(validator.validate_not_same("abcdef", "abcdef").is_err());
        assert!(validator.validate_not_same("abcdef", "abcdeg").is_ok());
    }
}
