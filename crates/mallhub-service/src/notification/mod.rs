//! System-wide notifications with per-user read state.

pub mod service;

pub use service::{CreateNotificationRequest, NotificationService};

pub const ERR_NOTIFICATION_NOT_EXIST: &str = "notification does not exist";
