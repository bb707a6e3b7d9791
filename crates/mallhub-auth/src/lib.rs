//! # mallhub-auth
//!
//! Credentials and tokens for MallHub.
//!
//! ## Modules
//!
//! - `jwt`: bearer token issuing and verification for users and admins
//! - `password`: Argon2id password hashing and length policy
//! - `code`: one-time password-reset codes

pub mod code;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, Role};
pub use password::{PasswordHasher, PasswordValidator};
