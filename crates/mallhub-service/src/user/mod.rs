//! User accounts: sign-up, sign-in, profile, and password changes.

pub mod service;

pub use service::{
    ChangePasswordRequest, ResetPasswordRequest, SigninRequest, SigninView, SignupRequest,
    UserService,
};

/// Message for a lookup of a user that is not there.
pub const ERR_USER_NOT_EXIST: &str = "user does not exist";
