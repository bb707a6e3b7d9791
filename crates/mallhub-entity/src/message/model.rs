//! Private message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use mallhub_core::types::format_timestamp;

/// A message sent by an admin to one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    /// Recipient.
    pub uid: Uuid,
    pub title: String,
    pub content: String,
    /// Whether the recipient opened the message.
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub uid: Uuid,
    pub title: String,
    pub content: String,
}

/// Message as seen by its recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub read: bool,
    /// Empty string when unread.
    pub read_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Message> for MessageView {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            content: m.content.clone(),
            read: m.read,
            read_at: m.read_at.as_ref().map(format_timestamp).unwrap_or_default(),
            created_at: format_timestamp(&m.created_at),
            updated_at: format_timestamp(&m.updated_at),
        }
    }
}

/// Message as seen by admins: carries the recipient, no read state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAdminView {
    pub id: Uuid,
    pub uid: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Message> for MessageAdminView {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id,
            uid: m.uid,
            title: m.title.clone(),
            content: m.content.clone(),
            created_at: format_timestamp(&m.created_at),
            updated_at: format_timestamp(&m.updated_at),
        }
    }
}
