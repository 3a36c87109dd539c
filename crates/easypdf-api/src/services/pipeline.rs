//! Transformation pipeline
//!
//! Every transformation endpoint runs the same workflow:
//! extract → validate → stage → transform → publish → clean up.
//!
//! Failures never reach the client as anything but `{"success":false}`; the
//! [`TransformError`] they carry is only logged.

use std::sync::Arc;

use axum::extract::Multipart;
use easypdf_core::{ArtifactName, LogLevel, TransformKind, TransformOutcome};
use easypdf_processing::validator::{file_extension, looks_like_pdf, sanitize_filename};
use easypdf_processing::validator::{UploadValidator, ValidationError};
use easypdf_processing::CodecError;
use easypdf_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

use super::types::{StagedUpload, TransformParams, TransformPlan};
use crate::state::AppState;
use crate::utils::upload::{extract_upload, normalize_mime_type, UploadError};

/// Why a transformation request failed.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Upload rejected: {0}")]
    MissingUpload(#[from] UploadError),

    #[error("Upload rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Codec failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Transformation task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl TransformError {
    pub fn log_level(&self) -> LogLevel {
        match self {
            TransformError::MissingUpload(_)
            | TransformError::Validation(_)
            | TransformError::UnsupportedFormat(_)
            | TransformError::InvalidParameter(_) => LogLevel::Debug,
            TransformError::Codec(e) if e.is_input_error() => LogLevel::Warn,
            TransformError::Codec(_)
            | TransformError::Storage(_)
            | TransformError::TaskFailed(_) => LogLevel::Error,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            TransformError::MissingUpload(_) => "MissingUpload",
            TransformError::Validation(_) => "Validation",
            TransformError::UnsupportedFormat(_) => "UnsupportedFormat",
            TransformError::InvalidParameter(_) => "InvalidParameter",
            TransformError::Codec(_) => "Codec",
            TransformError::Storage(_) => "Storage",
            TransformError::TaskFailed(_) => "TaskFailed",
        }
    }
}

/// Runs transformation requests against the shared application state.
pub struct TransformService {
    state: Arc<AppState>,
}

impl TransformService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Run one request to completion and collapse the result into its outcome.
    pub async fn run(&self, kind: TransformKind, multipart: Multipart) -> TransformOutcome {
        match self.execute(kind, multipart).await {
            Ok(artifact) => {
                tracing::info!(
                    operation = kind.operation(),
                    artifact = %artifact,
                    "Transformation succeeded"
                );
                TransformOutcome::success(&artifact)
            }
            Err(err) => {
                log_failure(kind, &err);
                TransformOutcome::Failure
            }
        }
    }

    async fn execute(
        &self,
        kind: TransformKind,
        multipart: Multipart,
    ) -> Result<ArtifactName, TransformError> {
        // 1. Extract the file part and the text fields
        let upload = extract_upload(multipart, kind.field_name()).await?;

        let validator = UploadValidator::new(self.state.config.max_upload_size_bytes());
        validator.validate_file_size(upload.data.len())?;
        validator.validate_filename(&upload.original_filename)?;

        // 2. Stage the upload
        let staged = self
            .stage(&upload.data, &upload.original_filename, &upload.content_type)
            .await?;
        let params = TransformParams::from_upload(kind, &upload);
        drop(upload);

        // 3-5. Transform, publish, clean up
        let result = match params {
            Ok(params) => self.transform_staged(kind, &params, &staged).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.remove_staged(&staged).await,
            Err(_) if !self.state.config.retain_failed_uploads() => {
                self.remove_staged(&staged).await
            }
            Err(_) => {
                tracing::debug!(key = %staged.key, "Keeping staged upload of failed request");
            }
        }

        result
    }

    async fn stage(
        &self,
        data: &[u8],
        original_filename: &str,
        content_type: &str,
    ) -> Result<StagedUpload, TransformError> {
        let staged = StagedUpload {
            key: Uuid::new_v4().to_string(),
            original_filename: sanitize_filename(original_filename),
            content_type: normalize_mime_type(content_type),
            extension: file_extension(original_filename),
            size: data.len(),
        };

        self.state.storage.uploads.put(&staged.key, data).await?;

        tracing::debug!(
            key = %staged.key,
            original_filename = %staged.original_filename,
            content_type = %staged.content_type,
            size_bytes = staged.size,
            "Staged upload"
        );

        Ok(staged)
    }

    async fn transform_staged(
        &self,
        kind: TransformKind,
        params: &TransformParams,
        staged: &StagedUpload,
    ) -> Result<ArtifactName, TransformError> {
        let plan = TransformPlan::new(kind, params, staged)?;
        let input = self.state.storage.uploads.read(&staged.key).await?;

        if kind.takes_document() && !looks_like_pdf(&input) {
            return Err(TransformError::UnsupportedFormat(format!(
                "'{}' is not a PDF document",
                staged.original_filename
            )));
        }

        // 3. Codec work is CPU-bound; keep it off the async workers
        let encoder = self.state.codecs.encoder.clone();
        let rasterizer = self.state.codecs.rasterizer.clone();
        let output = tokio::task::spawn_blocking(move || {
            plan.apply(encoder.as_ref(), rasterizer.as_ref(), &input)
        })
        .await??;

        // 4. Publish under a fresh name; an existing artifact is never replaced
        let artifact = plan.artifact_name(kind, self.state.clock.next_stamp());
        self.state
            .storage
            .output
            .put_new(artifact.as_str(), &output)
            .await?;

        tracing::debug!(
            artifact = %artifact,
            size_bytes = output.len(),
            "Published artifact"
        );

        Ok(artifact)
    }

    async fn remove_staged(&self, staged: &StagedUpload) {
        if let Err(e) = self.state.storage.uploads.delete(&staged.key).await {
            tracing::warn!(key = %staged.key, error = %e, "Failed to delete staged upload");
        }
    }
}

fn log_failure(kind: TransformKind, err: &TransformError) {
    let operation = kind.operation();
    let error_type = err.error_type();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(operation, error = %err, error_type, "Transformation failed");
        }
        LogLevel::Warn => {
            tracing::warn!(operation, error = %err, error_type, "Transformation failed");
        }
        LogLevel::Error => {
            tracing::error!(operation, error = %err, error_type, "Transformation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert_eq!(
            TransformError::UnsupportedFormat("gif".to_string()).log_level(),
            LogLevel::Debug
        );
        assert_eq!(
            TransformError::Codec(CodecError::Decode("bad".to_string())).log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            TransformError::Codec(CodecError::LibraryUnavailable("none".to_string())).log_level(),
            LogLevel::Error
        );
        assert_eq!(
            TransformError::Storage(StorageError::WriteFailed("disk".to_string())).log_level(),
            LogLevel::Error
        );
    }
}
