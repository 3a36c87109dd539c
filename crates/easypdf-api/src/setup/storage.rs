//! Storage namespaces for staged uploads and published artifacts

use crate::state::StorageState;
use anyhow::{Context, Result};
use easypdf_core::Config;
use easypdf_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create both directories (if missing) and wrap them as storage backends.
pub async fn setup_storage(config: &Config) -> Result<StorageState> {
    let uploads: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.upload_dir())
            .await
            .with_context(|| format!("Failed to prepare {}", config.upload_dir().display()))?,
    );
    let output: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.output_dir())
            .await
            .with_context(|| format!("Failed to prepare {}", config.output_dir().display()))?,
    );

    tracing::info!(
        uploads = %uploads.root().display(),
        output = %output.root().display(),
        "Local storage initialized"
    );

    Ok(StorageState { uploads, output })
}
