//! Input validation.
//!
//! Structural rules (presence, length, format) are declared with the
//! `validator` derive, each with its own message. [`Validated::FIELDS`]
//! fixes the order in which fields are reported, so the caller always sees
//! the first violation in declared order. Whitelist checks run afterwards.
//! Everything here runs before a transaction is opened.

pub mod region;

use validator::{Validate, ValidationError};

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;

/// An input type with ordered field rules and optional whitelist checks.
pub trait Validated: Validate {
    /// Field names in the order their rules are checked.
    const FIELDS: &'static [&'static str];

    /// Checks against closed value sets (region codes, enum values).
    fn check_whitelist(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Returns the first violation of `input` as `InvalidParams`.
pub fn validate<T: Validated>(input: &T) -> AppResult<()> {
    if let Err(errors) = input.validate() {
        let fields = errors.field_errors();
        for name in T::FIELDS {
            if let Some(first) = fields.get(*name).and_then(|errs| errs.first()) {
                return Err(AppError::invalid_params(message_of(name, first)));
            }
        }
        // A rule on a field missing from FIELDS still fails the input.
        let fallback = fields
            .iter()
            .find_map(|(name, errs)| errs.first().map(|e| message_of(name, e)))
            .unwrap_or_else(|| "invalid params".to_string());
        return Err(AppError::invalid_params(fallback));
    }
    input.check_whitelist()
}

fn message_of(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("invalid {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallhub_core::error::ErrorKind;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "please enter a name"))]
        name: String,
        #[validate(length(min = 1, message = "please enter a phone number"))]
        phone: String,
        #[validate(email(message = "invalid email address"))]
        email: String,
    }

    impl Validated for Sample {
        const FIELDS: &'static [&'static str] = &["name", "phone", "email"];

        fn check_whitelist(&self) -> AppResult<()> {
            if self.name == "root" {
                return Err(AppError::invalid_params("reserved name"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_first_violation_in_declared_order() {
        let input = Sample {
            name: String::new(),
            phone: String::new(),
            email: "nope".into(),
        };
        let err = validate(&input).unwrap_err();
        assert!(err.is(ErrorKind::InvalidParams));
        assert_eq!(err.message, "please enter a name");

        let input = Sample {
            name: "a".into(),
            phone: String::new(),
            email: "nope".into(),
        };
        assert_eq!(validate(&input).unwrap_err().message, "please enter a phone number");
    }

    #[test]
    fn test_whitelist_runs_after_rules() {
        let input = Sample {
            name: "root".into(),
            phone: "1".into(),
            email: "a@b.co".into(),
        };
        assert_eq!(validate(&input).unwrap_err().message, "reserved name");
    }

    #[test]
    fn test_valid_input() {
        let input = Sample {
            name: "a".into(),
            phone: "1".into(),
            email: "a@b.co".into(),
        };
        assert!(validate(&input).is_ok());
    }
}
