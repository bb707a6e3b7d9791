//! The caller's reports.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::report::ReportView;
use mallhub_service::report::CreateReportRequest;

use crate::extractors::{AppJson, AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// GET /v1/report
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<ReportView>> {
    Json(state.report_service.list_for_user(&auth, query).await.into())
}

/// POST /v1/report
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateReportRequest>,
) -> Json<Response<ReportView>> {
    Json(state.report_service.create(&auth, req).await.into())
}

/// GET /v1/report/r/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<ReportView>> {
    Json(state.report_service.get_for_user(&auth, id).await.into())
}
