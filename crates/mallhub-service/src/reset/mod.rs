//! One-time password-reset code issuance over email and SMS.

pub mod service;

pub use service::{RESET_CODE_TTL, ResetService, SendResetEmailRequest, SendResetSmsRequest};
