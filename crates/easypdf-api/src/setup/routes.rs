//! Route configuration and setup

use crate::api_doc;
use crate::constants::{DOWNLOAD_PREFIX, HEALTH_PATH, OPENAPI_PATH};
use crate::handlers::{download, health, pages, transform};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use easypdf_core::{Config, TransformKind};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries, part headers and text fields on top of the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    crate::error::set_expose_error_details(!config.is_production());

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    // Oversized bodies fail while the multipart stream is read, so the client still
    // gets the failure envelope rather than a bare 413.
    let body_limit = config
        .max_upload_size_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = transform_routes()
        .merge(public_routes())
        .fallback_service(ServeDir::new(config.public_dir()))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn transform_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            TransformKind::CompressImage.path(),
            post(transform::compress_image),
        )
        .route(
            TransformKind::ResizeImage.path(),
            post(transform::resize_image),
        )
        .route(
            TransformKind::ConvertImageFormat.path(),
            post(transform::convert_image_format),
        )
        .route(
            TransformKind::ImageToDocument.path(),
            post(transform::image_to_pdf),
        )
        .route(
            TransformKind::DocumentToImage.path(),
            post(transform::pdf_to_image),
        )
        .route(
            TransformKind::CompressDocument.path(),
            post(transform::compress_pdf),
        )
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/{{file}}", DOWNLOAD_PREFIX),
            get(download::download_artifact),
        )
        .route(HEALTH_PATH, get(health::health_check))
        .route(OPENAPI_PATH, get(api_doc::openapi_json))
        .route("/robots.txt", get(pages::robots_txt))
        .route("/sitemap.xml", get(pages::sitemap_xml))
        .route("/", get(pages::index))
        .route("/{page}", get(pages::page))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
