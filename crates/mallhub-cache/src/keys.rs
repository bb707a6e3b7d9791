//! Key builders for every entry MallHub writes to the TTL store.

/// Key of a pending email reset code; the stored value is the owner id.
pub fn reset_code(code: &str) -> String {
    format!("reset:{code}")
}

/// Key of the one live SMS reset code for `phone`; the stored value is
/// `"{owner_id}:{code}"`.
pub fn sms_reset_code(phone: &str) -> String {
    format!("reset:sms:{phone}")
}

/// Key of the redemption attempt counter for `phone`.
pub fn sms_reset_attempts(phone: &str) -> String {
    format!("reset:sms:attempts:{phone}")
}
