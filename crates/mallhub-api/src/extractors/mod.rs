//! Custom Axum extractors.
//!
//! Thin wrappers over Axum's own extractors whose rejection is a failed
//! envelope instead of a 4xx status.

pub mod auth;
pub mod json;
pub mod path;
pub mod query;

pub use auth::{AdminUser, AuthUser};
pub use json::AppJson;
pub use path::AppPath;
pub use query::AppQuery;
