//! Report entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use mallhub_core::AppError;
use mallhub_core::types::format_timestamp;

/// What a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Bug,
    Feature,
    Suggestion,
    Other,
}

impl FromStr for ReportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            "suggestion" => Ok(Self::Suggestion),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_params("invalid report type")),
        }
    }
}

/// Processing state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Waiting for an admin.
    Pending,
    /// Handled by an admin.
    Resolved,
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            _ => Err(AppError::invalid_params("invalid report status")),
        }
    }
}

/// Feedback filed by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    /// Reporter.
    pub uid: Uuid,
    pub title: String,
    pub content: String,
    #[sqlx(rename = "type")]
    pub kind: ReportType,
    pub status: ReportStatus,
    /// Screenshot URLs.
    pub screenshots: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a report. New reports are always pending.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub uid: Uuid,
    pub title: String,
    pub content: String,
    pub kind: ReportType,
    pub screenshots: Vec<String>,
}

/// Report as seen by its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub status: ReportStatus,
    pub screenshots: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Report> for ReportView {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            content: r.content.clone(),
            kind: r.kind,
            status: r.status,
            screenshots: r.screenshots.clone(),
            created_at: format_timestamp(&r.created_at),
            updated_at: format_timestamp(&r.updated_at),
        }
    }
}

/// Report as seen by admins; includes the reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAdminView {
    pub id: Uuid,
    pub uid: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub status: ReportStatus,
    pub screenshots: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Report> for ReportAdminView {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id,
            uid: r.uid,
            title: r.title.clone(),
            content: r.content.clone(),
            kind: r.kind,
            status: r.status,
            screenshots: r.screenshots.clone(),
            created_at: format_timestamp(&r.created_at),
            updated_at: format_timestamp(&r.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_view_uses_type_key() {
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            uid: Uuid::new_v4(),
            title: "crash".into(),
            content: "app crashes on launch".into(),
            kind: ReportType::Bug,
            status: ReportStatus::Pending,
            screenshots: vec![],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(ReportView::from(&report)).unwrap();
        assert_eq!(json["type"], "bug");
        assert_eq!(json["status"], "pending");
        assert!(json.get("uid").is_none());
    }

    #[test]
    fn test_parse_whitelists() {
        assert_eq!("bug".parse::<ReportType>().unwrap(), ReportType::Bug);
        assert_eq!(
            "spam".parse::<ReportType>().unwrap_err().message,
            "invalid report type"
        );
        assert_eq!(
            "resolved".parse::<ReportStatus>().unwrap(),
            ReportStatus::Resolved
        );
    }
}
