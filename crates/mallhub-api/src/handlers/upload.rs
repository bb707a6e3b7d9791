//! Multipart uploads and serving of stored uploads.

use std::path::Path as FsPath;

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response as HttpResponse};
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::Response;
use mallhub_service::upload::{UploadKind, UploadView};

use crate::error::ERR_INVALID_PARAMS;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Pulls the `file` part out of a multipart body.
async fn read_file_part(multipart: &mut Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::invalid_params(ERR_INVALID_PARAMS))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let origin = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            debug!(error = %e, "Failed to read upload part");
            AppError::invalid_params(ERR_INVALID_PARAMS)
        })?;
        return Ok((origin, data));
    }
    Err(AppError::invalid_params("please choose a file"))
}

async fn upload(
    state: &AppState,
    kind: UploadKind,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<UploadView> {
    let mut multipart = multipart.map_err(|_| AppError::invalid_params(ERR_INVALID_PARAMS))?;
    let (origin, data) = read_file_part(&mut multipart).await?;
    state.upload_service.save(kind, &origin, data).await
}

/// POST /v1/upload/image
pub async fn upload_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<Response<UploadView>> {
    Json(upload(&state, UploadKind::Image, multipart).await.into())
}

/// POST /v1/upload/file
pub async fn upload_file(
    State(state): State<AppState>,
    _auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<Response<UploadView>> {
    Json(upload(&state, UploadKind::File, multipart).await.into())
}

fn content_type(path: &FsPath) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

async fn serve(state: &AppState, kind: UploadKind, filename: &str) -> HttpResponse {
    let Some(path) = state.upload_service.resolve(kind, filename).await else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to open upload");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let mut response = Body::from_stream(ReaderStream::new(file)).into_response();
    if let Ok(value) = content_type(&path).parse() {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    if kind == UploadKind::File
        && let Ok(value) = format!("attachment; filename=\"{filename}\"").parse()
    {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

/// GET /v1/resource/image/{filename}
pub async fn image(State(state): State<AppState>, Path(filename): Path<String>) -> HttpResponse {
    serve(&state, UploadKind::Image, &filename).await
}

/// GET /v1/resource/file/{filename}
pub async fn file(State(state): State<AppState>, Path(filename): Path<String>) -> HttpResponse {
    serve(&state, UploadKind::File, &filename).await
}
