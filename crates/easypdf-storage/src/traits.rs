//! Storage abstraction trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream of a stored file.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A flat file namespace.
///
/// Each write is whole-file: callers never observe a partially written file under a
/// key after `put` has returned an error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key`, replacing any existing file.
    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Write `data` under `key` only if nothing is stored there yet. An existing file
    /// is left untouched and reported as [`StorageError::AlreadyExists`].
    async fn put_new(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Read the whole file stored under `key`.
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete the file under `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Stream the file under `key` in chunks.
    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream>;

    /// Directory backing this namespace.
    fn root(&self) -> &Path;
}
