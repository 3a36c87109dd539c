use std::path::Path;

/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Upload validator
///
/// Only checks what can be known before decoding. Whether the bytes are a usable
/// image or document is left to the codec.
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Reject client filenames that carry path components or control characters.
    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.chars().any(char::is_control)
        {
            return Err(ValidationError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }
}

/// Lowercased extension of a client-supplied filename.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Reduce a client-supplied filename to a bare name safe for logs and headers.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// PDF magic bytes check
pub fn looks_like_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}
