//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use mallhub_core::types::format_timestamp;

use super::mark::NotificationMark;

/// A notification broadcast to every user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    /// Admin who published it.
    pub author: Uuid,
    pub title: String,
    pub content: String,
    /// Internal remark, admins only.
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub author: Uuid,
    pub title: String,
    pub content: String,
    pub note: Option<String>,
}

/// Notification as seen by a user, with that user's read state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub read: bool,
    /// Empty string when unread.
    pub read_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NotificationView {
    /// Project a notification, deriving the read state from `mark`.
    pub fn new(n: &Notification, mark: Option<&NotificationMark>) -> Self {
        Self {
            id: n.id,
            title: n.title.clone(),
            content: n.content.clone(),
            read: mark.is_some(),
            read_at: mark
                .map(|m| format_timestamp(&m.created_at))
                .unwrap_or_default(),
            created_at: format_timestamp(&n.created_at),
            updated_at: format_timestamp(&n.updated_at),
        }
    }
}

/// Notification as seen by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAdminView {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub content: String,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Notification> for NotificationAdminView {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            author: n.author,
            title: n.title.clone(),
            content: n.content.clone(),
            note: n.note.clone(),
            created_at: format_timestamp(&n.created_at),
            updated_at: format_timestamp(&n.updated_at),
        }
    }
}
