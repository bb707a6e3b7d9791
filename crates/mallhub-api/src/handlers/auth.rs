//! Sign-up, sign-in, and password reset handlers.

use axum::Json;
use axum::extract::State;

use mallhub_core::types::Response;
use mallhub_entity::user::UserView;
use mallhub_service::reset::{SendResetEmailRequest, SendResetSmsRequest};
use mallhub_service::user::{ResetPasswordRequest, SigninRequest, SigninView, SignupRequest};

use crate::extractors::AppJson;
use crate::state::AppState;

/// POST /v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> Json<Response<UserView>> {
    Json(state.user_service.signup(req).await.into())
}

/// POST /v1/auth/signin
pub async fn signin(
    State(state): State<AppState>,
    AppJson(req): AppJson<SigninRequest>,
) -> Json<Response<SigninView>> {
    Json(state.user_service.signin(req).await.into())
}

/// POST /v1/auth/password/reset
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> Json<Response<bool>> {
    Json(state.user_service.reset_password(req).await.into())
}

/// POST /v1/email/send/password/reset
///
/// Answers `data: false` rather than `null` when sending fails.
pub async fn send_reset_email(
    State(state): State<AppState>,
    AppJson(req): AppJson<SendResetEmailRequest>,
) -> Json<Response<bool>> {
    Json(match state.reset_service.send_reset_email(req).await {
        Ok(sent) => Response::ok(sent),
        Err(err) => Response::fail_with(&err, false),
    })
}

/// POST /v1/phone/send/password/reset
pub async fn send_reset_sms(
    State(state): State<AppState>,
    AppJson(req): AppJson<SendResetSmsRequest>,
) -> Json<Response<bool>> {
    Json(state.reset_service.send_reset_sms(req).await.into())
}
