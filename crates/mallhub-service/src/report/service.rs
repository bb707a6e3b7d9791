//! Report operations.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::report::{NewReport, ReportAdminView, ReportStatus, ReportType, ReportView};

use super::ERR_REPORT_NOT_EXIST;
use crate::context::RequestContext;
use crate::unit_of_work::UnitOfWork;
use crate::validation::{Validated, validate};

/// Request to file a report.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "please enter a title"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please describe the problem"))]
    pub content: String,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "please choose a report type"))]
    pub kind: String,
    #[serde(default)]
    #[validate(length(max = 9, message = "at most 9 screenshots"))]
    pub screenshots: Vec<String>,
}

impl Validated for CreateReportRequest {
    const FIELDS: &'static [&'static str] = &["title", "content", "kind", "screenshots"];

    fn check_whitelist(&self) -> AppResult<()> {
        self.kind.parse::<ReportType>().map(|_| ())
    }
}

/// Request to move a report to another status.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateReportStatusRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please choose a status"))]
    pub status: String,
}

impl Validated for UpdateReportStatusRequest {
    const FIELDS: &'static [&'static str] = &["status"];

    fn check_whitelist(&self) -> AppResult<()> {
        self.status.parse::<ReportStatus>().map(|_| ())
    }
}

/// Handles reports.
#[derive(Debug, Clone)]
pub struct ReportService {
    uow: UnitOfWork,
}

impl ReportService {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }

    /// Files a pending report for the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateReportRequest,
    ) -> AppResult<ReportView> {
        validate(&input)?;
        let kind: ReportType = input.kind.parse()?;

        let uid = ctx.actor_id;
        let report = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.reports()
                        .create(NewReport {
                            uid,
                            title: input.title,
                            content: input.content,
                            kind,
                            screenshots: input.screenshots,
                        })
                        .await
                })
            })
            .await?;

        info!(report_id = %report.id, user_id = %uid, "Report filed");
        Ok(ReportView::from(&report))
    }

    /// The caller's reports.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        query: Query,
    ) -> AppResult<Paged<ReportView>> {
        let uid = ctx.actor_id;
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.reports().list_for_user(uid, query).await }))
            .await?;
        Ok(page.map(|r| ReportView::from(&r)))
    }

    /// One of the caller's reports.
    pub async fn get_for_user(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ReportView> {
        let uid = ctx.actor_id;
        let report = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.reports()
                        .find_for_user(id, uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_REPORT_NOT_EXIST))
                })
            })
            .await?;
        Ok(ReportView::from(&report))
    }

    /// Every report, for admins.
    pub async fn list(&self, query: Query) -> AppResult<Paged<ReportAdminView>> {
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.reports().list(query).await }))
            .await?;
        Ok(page.map(|r| ReportAdminView::from(&r)))
    }

    /// One report, for admins.
    pub async fn get(&self, id: Uuid) -> AppResult<ReportAdminView> {
        let report = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.reports()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_REPORT_NOT_EXIST))
                })
            })
            .await?;
        Ok(ReportAdminView::from(&report))
    }

    /// Moves a report to `status`.
    pub async fn update_status(
        &self,
        id: Uuid,
        input: UpdateReportStatusRequest,
    ) -> AppResult<ReportAdminView> {
        validate(&input)?;
        let status: ReportStatus = input.status.parse()?;

        let report = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.reports()
                        .update_status(id, status)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_REPORT_NOT_EXIST))
                })
            })
            .await?;

        info!(report_id = %id, status = ?status, "Report status updated");
        Ok(ReportAdminView::from(&report))
    }
}
