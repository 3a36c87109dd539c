//! HTTP error response conversion
//!
//! Transformation endpoints never return these: they always answer with the
//! success/failure envelope. `HttpAppError` is for the download, page and health
//! routes, which report failures through status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use easypdf_core::{AppError, ErrorMetadata, LogLevel};
use easypdf_storage::StorageError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
            code: code.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse (orphan rule: both the trait
/// and AppError are foreign to this crate).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app_error = match err {
            StorageError::NotFound(key) | StorageError::InvalidKey(key) => {
                AppError::NotFound(key)
            }
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app_error)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Whether error bodies carry `details` and `error_type`. Set from
/// [`Config::is_production`](easypdf_core::Config::is_production) when the router is built.
static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

pub fn set_expose_error_details(expose: bool) {
    EXPOSE_ERROR_DETAILS.store(expose, Ordering::Relaxed);
}

fn expose_error_details() -> bool {
    EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
        if expose_error_details() && !app_error.is_sensitive() {
            body.details = Some(app_error.to_string());
            body.error_type = Some(app_error.error_type().to_string());
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let err = HttpAppError::from(StorageError::NotFound("a.jpg".to_string()));
        assert_eq!(err.0.http_status_code(), 404);

        let err = HttpAppError::from(StorageError::InvalidKey("../a".to_string()));
        assert_eq!(err.0.http_status_code(), 404);
    }

    #[test]
    fn test_storage_failure_maps_to_500() {
        let err = HttpAppError::from(StorageError::ReadFailed("disk".to_string()));
        assert_eq!(err.0.http_status_code(), 500);
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // Single test owns the global flag so parallel tests cannot interleave on it.
    #[tokio::test]
    async fn test_error_details_follow_configured_flag() {
        set_expose_error_details(false);
        let response = HttpAppError(AppError::NotFound("a.jpg".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("details").is_none());
        assert!(body.get("error_type").is_none());

        set_expose_error_details(true);
        let body =
            body_json(HttpAppError(AppError::NotFound("a.jpg".to_string())).into_response()).await;
        assert_eq!(body["error_type"], "NotFound");
        assert!(body["details"].as_str().unwrap().contains("a.jpg"));

        // Sensitive errors never expose details.
        let body =
            body_json(HttpAppError(AppError::Storage("disk".to_string())).into_response()).await;
        assert!(body.get("details").is_none());
    }
}
