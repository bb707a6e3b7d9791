//! System notification entities.

pub mod mark;
pub mod model;

pub use mark::NotificationMark;
pub use model::{NewNotification, Notification, NotificationAdminView, NotificationView};
