//! Convenience result type alias for MallHub.

use crate::error::AppError;

/// A specialized `Result` type for MallHub operations.
pub type AppResult<T> = Result<T, AppError>;
