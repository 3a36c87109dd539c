use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the directory if absent.
    ///
    /// # Arguments
    /// * `base_path` - Root directory of the namespace (e.g., "uploads" or "output")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a key to a filesystem path inside the namespace.
    ///
    /// Keys are flat names; anything that could address a file outside the base
    /// directory is rejected.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
            || key.contains('\0')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.base_path.join(key))
    }

    async fn write_file(&self, key: &str, data: &[u8], create_new: bool) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let mut options = fs::OpenOptions::new();
        options.write(true);
        if create_new {
            options.create_new(true);
        } else {
            options.create(true).truncate(true);
        }

        // Nothing to clean up if the open fails: the file is either absent or not ours.
        let mut file = match options.open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()))
            }
            Err(e) => {
                return Err(StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let result = async {
            file.write_all(data).await.map_err(|e| {
                StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
            })?;

            file.sync_all().await.map_err(|e| {
                StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
            })
        }
        .await;

        if let Err(e) = result {
            // Never leave a truncated file behind under a valid key.
            if let Err(cleanup_err) = fs::remove_file(&path).await {
                if cleanup_err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        error = %cleanup_err,
                        path = %path.display(),
                        "Failed to remove partial file after write error"
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        self.write_file(key, data, false).await
    }

    async fn put_new(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        self.write_file(key, data, true).await
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;

        match fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(
                    path = %path.display(),
                    key = %key,
                    size_bytes = data.len(),
                    "Local storage read successful"
                );
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), key = %key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(key)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        // Directories open fine on unix but fail on the first read.
        if !file.metadata().await?.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let key = key.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(key = %key, error = %e, "Local storage stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}
