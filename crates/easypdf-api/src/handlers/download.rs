use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use easypdf_core::AppError;
use easypdf_processing::validator::sanitize_filename;
use futures::StreamExt;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/download/{file}",
    tag = "downloads",
    params(
        ("file" = String, Path, description = "Artifact filename from a `downloadUrl`")
    ),
    responses(
        (status = 200, description = "Artifact file", content_type = "application/octet-stream"),
        (status = 404, description = "Artifact not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_artifact"))]
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stream = state.storage.output.download_stream(&file).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let content_type = mime_guess::from_path(&file).first_or_octet_stream();
    let content_disposition = format!("attachment; filename=\"{}\"", sanitize_filename(&file));

    tracing::debug!(file = %file, content_type = %content_type, "Streaming artifact");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
