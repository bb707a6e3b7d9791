//! Admin entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use mallhub_core::types::format_timestamp;

/// An administrator of the back office.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    /// Unique admin identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Super admins may create other admins.
    pub is_super: bool,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub is_super: bool,
}

/// Columns an admin row may be deleted by.
///
/// A closed set, so the column name never comes from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminField {
    Id,
    Username,
}

impl AdminField {
    /// Column name in the `admins` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
        }
    }

    /// Whether `admin` carries `value` in this column.
    pub fn matches(&self, admin: &Admin, value: &str) -> bool {
        match self {
            Self::Id => admin.id.to_string() == value,
            Self::Username => admin.username == value,
        }
    }
}

/// Admin profile as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminView {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub is_super: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Admin> for AdminView {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            name: admin.name.clone(),
            is_super: admin.is_super,
            created_at: format_timestamp(&admin.created_at),
            updated_at: format_timestamp(&admin.updated_at),
        }
    }
}
