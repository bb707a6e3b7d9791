//! Local-disk storage for uploaded images and files.

pub mod service;

pub use service::{UploadKind, UploadService, UploadView};
