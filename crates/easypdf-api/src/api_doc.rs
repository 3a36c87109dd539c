//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use easypdf_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EasyPDF API",
        version = "0.1.0",
        description = "File conversion API: compress, resize and convert images, turn images into PDFs, export PDF pages as images and compress PDFs. Every transformation answers with a success flag and, on success, a download URL."
    ),
    paths(
        // Images
        handlers::transform::compress_image,
        handlers::transform::resize_image,
        handlers::transform::convert_image_format,
        // Documents
        handlers::transform::image_to_pdf,
        handlers::transform::pdf_to_image,
        handlers::transform::compress_pdf,
        // Downloads
        handlers::download::download_artifact,
    ),
    components(
        schemas(
            models::TransformEnvelope,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "images", description = "Raster image transformations"),
        (name = "documents", description = "PDF transformations"),
        (name = "downloads", description = "Artifact downloads"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
