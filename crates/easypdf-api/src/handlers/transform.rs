//! Transformation endpoints
//!
//! Each route answers HTTP 200 with a [`TransformEnvelope`], whatever happened.
//! A request that is not even readable as multipart gets the failure envelope too.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use easypdf_core::{TransformEnvelope, TransformKind, TransformOutcome};

use crate::services::TransformService;
use crate::state::AppState;

async fn transform(
    state: &Arc<AppState>,
    kind: TransformKind,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    let outcome = match multipart {
        Ok(multipart) => TransformService::new(state).run(kind, multipart).await,
        Err(rejection) => {
            tracing::debug!(
                operation = kind.operation(),
                error = %rejection,
                "Request body is not multipart"
            );
            TransformOutcome::Failure
        }
    };
    Json(outcome.into())
}

/// Re-encode an image as JPEG at quality 60.
#[utoipa::path(
    post,
    path = "/api/image-compress",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "File part `image`"),
    responses(
        (status = 200, description = "Outcome envelope", body = TransformEnvelope)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "compress-image"))]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    transform(&state, TransformKind::CompressImage, multipart).await
}

/// Scale an image to `width` pixels, keeping its aspect ratio.
#[utoipa::path(
    post,
    path = "/api/image-resize",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "File part `image` and text field `width` (positive integer)"),
    responses(
        (status = 200, description = "Outcome envelope", body = TransformEnvelope)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "resize-image"))]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    transform(&state, TransformKind::ResizeImage, multipart).await
}

/// Convert png to jpg or jpg/jpeg to png, chosen by the uploaded file's extension.
#[utoipa::path(
    post,
    path = "/api/jpg-png",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "File part `image` named *.png, *.jpg or *.jpeg"),
    responses(
        (status = 200, description = "Outcome envelope", body = TransformEnvelope)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "image-format-convert"))]
pub async fn convert_image_format(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    transform(&state, TransformKind::ConvertImageFormat, multipart).await
}

/// Embed an image as the single page of a new PDF.
#[utoipa::path(
    post,
    path = "/api/jpg-to-pdf",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "File part `image`"),
    responses(
        (status = 200, description = "Outcome envelope", body = TransformEnvelope)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "image-to-document"))]
pub async fn image_to_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    transform(&state, TransformKind::ImageToDocument, multipart).await
}

/// Render the first page of a PDF as a JPEG.
#[utoipa::path(
    post,
    path = "/api/pdf-to-jpg",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "File part `pdf`"),
    responses(
        (status = 200, description = "Outcome envelope", body = TransformEnvelope)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "document-to-image"))]
pub async fn pdf_to_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    transform(&state, TransformKind::DocumentToImage, multipart).await
}

/// Rebuild a PDF from low-quality JPEG renders of every page.
#[utoipa::path(
    post,
    path = "/api/compress-pdf",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "File part `pdf`"),
    responses(
        (status = 200, description = "Outcome envelope", body = TransformEnvelope)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "compress-document"))]
pub async fn compress_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<TransformEnvelope> {
    transform(&state, TransformKind::CompressDocument, multipart).await
}
