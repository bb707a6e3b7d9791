//! # mallhub-core
//!
//! Core crate for MallHub. Contains the unified error system, the response
//! envelope every operation returns, pagination normalization, configuration
//! schemas, and the traits implemented by infrastructure crates.
//!
//! This crate has **no** internal dependencies on other MallHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
