//! Core type definitions used across the MallHub workspace.

pub mod pagination;
pub mod response;
pub mod timestamp;

pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, Paged, Query};
pub use response::{List, Meta, Response, Status};
pub use timestamp::format_timestamp;
