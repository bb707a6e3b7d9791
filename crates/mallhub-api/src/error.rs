//! Envelope-shaped rejections.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as HttpResponse};

use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::types::Response;

/// Message returned when a body, query, or path cannot be decoded.
pub const ERR_INVALID_PARAMS: &str = "invalid params";

/// An error raised before a handler runs (extractor rejection).
///
/// Rendered as a failed envelope with HTTP 200, like every other failure.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The generic decode failure.
    pub fn invalid_params() -> Self {
        Self(AppError::invalid_params(ERR_INVALID_PARAMS))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        if self.0.is(ErrorKind::Unknown) {
            tracing::error!(error = %self.0, "Request failed");
        }
        (StatusCode::OK, Json(Response::<()>::fail(&self.0))).into_response()
    }
}
