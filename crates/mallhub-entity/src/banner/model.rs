//! Banner entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use mallhub_core::AppError;
use mallhub_core::types::format_timestamp;

/// Client platform a banner targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "banner_platform", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BannerPlatform {
    /// Mobile app.
    App,
    /// Desktop web.
    Pc,
}

impl BannerPlatform {
    /// Return the platform as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Pc => "pc",
        }
    }
}

impl fmt::Display for BannerPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BannerPlatform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app" => Ok(Self::App),
            "pc" => Ok(Self::Pc),
            _ => Err(AppError::invalid_params("invalid banner platform")),
        }
    }
}

/// A promotional banner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Banner {
    pub id: Uuid,
    /// Image URL.
    pub image: String,
    /// Link target.
    pub href: String,
    pub platform: BannerPlatform,
    pub description: Option<String>,
    /// Higher sorts first.
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a banner.
#[derive(Debug, Clone)]
pub struct NewBanner {
    pub image: String,
    pub href: String,
    pub platform: BannerPlatform,
    pub description: Option<String>,
    pub priority: i32,
}

/// Banner as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerView {
    pub id: Uuid,
    pub image: String,
    pub href: String,
    pub platform: BannerPlatform,
    pub description: Option<String>,
    pub priority: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Banner> for BannerView {
    fn from(b: &Banner) -> Self {
        Self {
            id: b.id,
            image: b.image.clone(),
            href: b.href.clone(),
            platform: b.platform,
            description: b.description.clone(),
            priority: b.priority,
            created_at: format_timestamp(&b.created_at),
            updated_at: format_timestamp(&b.updated_at),
        }
    }
}
