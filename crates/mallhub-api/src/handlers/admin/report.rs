//! Report triage.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::report::ReportAdminView;
use mallhub_service::report::UpdateReportStatusRequest;

use crate::extractors::{AdminUser, AppJson, AppPath, AppQuery};
use crate::state::AppState;

/// GET /v1/admin/report
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<ReportAdminView>> {
    Json(state.report_service.list(query).await.into())
}

/// GET /v1/admin/report/r/{id}
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<ReportAdminView>> {
    Json(state.report_service.get(id).await.into())
}

/// PUT /v1/admin/report/r/{id}
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateReportStatusRequest>,
) -> Json<Response<ReportAdminView>> {
    Json(state.report_service.update_status(id, req).await.into())
}
