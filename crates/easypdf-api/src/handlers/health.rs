//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use easypdf_storage::Storage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub uploads: String,
    pub output: String,
}

/// "healthy", "timeout", or "unhealthy: {error}" for one storage namespace.
async fn check_storage(storage: &dyn Storage) -> String {
    match tokio::time::timeout(TIMEOUT, tokio::fs::metadata(storage.root())).await {
        Ok(Ok(meta)) if meta.is_dir() => "healthy".to_string(),
        Ok(Ok(_)) => "unhealthy: not a directory".to_string(),
        Ok(Err(e)) => format!("unhealthy: {}", e),
        Err(_) => "timeout".to_string(),
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uploads = check_storage(state.storage.uploads.as_ref()).await;
    let output = check_storage(state.storage.output.as_ref()).await;

    let healthy = uploads == "healthy" && output == "healthy";
    if !healthy {
        tracing::error!(uploads = %uploads, output = %output, "Health check failed");
    }

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        uploads,
        output,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
