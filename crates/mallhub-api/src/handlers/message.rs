//! The caller's private messages.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use mallhub_core::types::{List, Query, Response};
use mallhub_entity::message::MessageView;

use crate::extractors::{AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// GET /v1/message
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<Query>,
) -> Json<List<MessageView>> {
    Json(state.message_service.list_for_user(&auth, query).await.into())
}

/// GET /v1/message/m/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Json<Response<MessageView>> {
    Json(state.message_service.get_for_user(&auth, id).await.into())
}
