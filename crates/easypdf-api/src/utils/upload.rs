//! Multipart extraction for the transformation endpoints

use axum::extract::Multipart;
use std::collections::HashMap;
use thiserror::Error;

/// Reasons a request did not yield exactly one usable file part.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read multipart: {0}")]
    Multipart(String),

    #[error("No file provided in field '{0}'")]
    MissingField(&'static str),

    #[error("Multiple files in field '{0}'; send exactly one")]
    DuplicateField(&'static str),

    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),
}

/// One uploaded file plus the text fields sent alongside it.
#[derive(Debug)]
pub struct ReceivedUpload {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub content_type: String,
    pub fields: HashMap<String, String>,
}

impl ReceivedUpload {
    /// Text field by name, trimmed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim())
    }
}

/// Read every part of `multipart`. The file must arrive under `file_field`; any
/// other part carrying a filename is rejected, other parts are kept as text fields.
pub async fn extract_upload(
    mut multipart: Multipart,
    file_field: &'static str,
) -> Result<ReceivedUpload, UploadError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == file_field {
            if file_data.is_some() {
                return Err(UploadError::DuplicateField(file_field));
            }
            filename = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;

            file_data = Some(data.to_vec());
        } else if field.file_name().is_some() {
            return Err(UploadError::UnexpectedField(field_name));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;
            fields.insert(field_name, value);
        }
    }

    let data = file_data.ok_or(UploadError::MissingField(file_field))?;

    Ok(ReceivedUpload {
        data,
        original_filename: filename.unwrap_or_else(|| "unknown".to_string()),
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        fields,
    })
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}
