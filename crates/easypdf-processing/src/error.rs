//! Codec error types

use thiserror::Error;

/// Failures raised by codec calls.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Failed to rasterize page {page}: {detail}")]
    Rasterize { page: usize, detail: String },

    #[error("Failed to assemble document: {0}")]
    Assemble(String),

    #[error("PDF rendering library unavailable: {0}")]
    LibraryUnavailable(String),
}

impl CodecError {
    /// Whether the failure was caused by the uploaded content rather than the server.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CodecError::Decode(_)
                | CodecError::UnsupportedFormat(_)
                | CodecError::InvalidParameter(_)
                | CodecError::InvalidDocument(_)
        )
    }
}

impl From<::image::ImageError> for CodecError {
    fn from(err: ::image::ImageError) -> Self {
        match err {
            ::image::ImageError::Unsupported(e) => CodecError::UnsupportedFormat(e.to_string()),
            ::image::ImageError::Decoding(e) => CodecError::Decode(e.to_string()),
            ::image::ImageError::Parameter(e) => CodecError::InvalidParameter(e.to_string()),
            other => CodecError::Encode(other.to_string()),
        }
    }
}

impl From<lopdf::Error> for CodecError {
    fn from(err: lopdf::Error) -> Self {
        CodecError::Assemble(err.to_string())
    }
}

/// Result type for codec calls
pub type CodecResult<T> = Result<T, CodecError>;
