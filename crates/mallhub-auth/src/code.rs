//! One-time password-reset codes.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of an email reset code in hex characters.
pub const RESET_CODE_LEN: usize = 32;

/// Number of digits in an SMS code.
pub const SMS_CODE_DIGITS: u32 = 6;

/// Email reset code for `uid`: the first 32 hex characters of
/// SHA-256(`"reset-"` + fresh uuid + uid).
pub fn reset_code(uid: Uuid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("reset-{}{}", Uuid::new_v4(), uid).as_bytes());
    let mut code = hex::encode(hasher.finalize());
    code.truncate(RESET_CODE_LEN);
    code
}

/// Whether `code` has the shape of an email reset code.
pub fn is_reset_code(code: &str) -> bool {
    code.len() == RESET_CODE_LEN && code.chars().all(|c| c.is_ascii_hexdigit())
}

/// Zero-padded six-digit numeric code for SMS delivery.
pub fn sms_code() -> String {
    let modulus = 10_u128.pow(SMS_CODE_DIGITS);
    let n = Uuid::new_v4().as_u128() % modulus;
    format!("{n:0width$}", width = SMS_CODE_DIGITS as usize)
}
