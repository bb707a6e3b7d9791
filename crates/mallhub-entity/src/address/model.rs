//! Address entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use mallhub_core::types::format_timestamp;

/// A shipping address owned by a user.
///
/// At most one address per owner has `is_default = true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    /// Unique address identifier.
    pub id: Uuid,
    /// Owning user.
    pub uid: Uuid,
    /// Recipient name.
    pub name: String,
    /// Recipient phone.
    pub phone: String,
    /// Province code from the region table.
    pub province_code: String,
    /// City code from the region table.
    pub city_code: String,
    /// Area code from the region table.
    pub area_code: String,
    /// Street-level detail.
    pub address: String,
    /// Whether this is the owner's default address.
    pub is_default: bool,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
    /// When the address was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert an address.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub uid: Uuid,
    pub name: String,
    pub phone: String,
    pub province_code: String,
    pub city_code: String,
    pub area_code: String,
    pub address: String,
    pub is_default: bool,
}

/// Address as returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressView {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub province_code: String,
    pub city_code: String,
    pub area_code: String,
    pub address: String,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Address> for AddressView {
    fn from(a: &Address) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            phone: a.phone.clone(),
            province_code: a.province_code.clone(),
            city_code: a.city_code.clone(),
            area_code: a.area_code.clone(),
            address: a.address.clone(),
            is_default: a.is_default,
            created_at: format_timestamp(&a.created_at),
            updated_at: format_timestamp(&a.updated_at),
        }
    }
}
