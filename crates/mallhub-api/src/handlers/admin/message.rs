//! Message management.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::message::MessageAdminView;
use mallhub_service::message::CreateMessageRequest;

use crate::extractors::{AdminUser, AppJson, AppPath, AppQuery};
use crate::state::AppState;

/// GET /v1/admin/message
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<MessageAdminView>> {
    Json(state.message_service.list(query).await.into())
}

/// POST /v1/admin/message
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(req): AppJson<CreateMessageRequest>,
) -> Json<Response<MessageAdminView>> {
    Json(state.message_service.create(req).await.into())
}

/// GET /v1/admin/message/m/{id}
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<MessageAdminView>> {
    Json(state.message_service.get(id).await.into())
}

/// DELETE /v1/admin/message/m/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<MessageAdminView>> {
    Json(state.message_service.delete(id).await.into())
}
