//! Request and artifact models
//!
//! Every transformation endpoint follows the same lifecycle and differs only in the
//! multipart field it reads, the codec call it makes and the artifact name it writes.
//! Those per-kind facts live on [`TransformKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use utoipa::ToSchema;

/// Route prefix for artifact downloads.
pub const DOWNLOAD_PREFIX: &str = "/download";

/// The six fixed transformation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    CompressImage,
    ResizeImage,
    ConvertImageFormat,
    ImageToDocument,
    DocumentToImage,
    CompressDocument,
}

impl TransformKind {
    pub const ALL: [TransformKind; 6] = [
        TransformKind::CompressImage,
        TransformKind::ResizeImage,
        TransformKind::ConvertImageFormat,
        TransformKind::ImageToDocument,
        TransformKind::DocumentToImage,
        TransformKind::CompressDocument,
    ];

    /// HTTP route serving this kind.
    pub fn path(self) -> &'static str {
        match self {
            TransformKind::CompressImage => "/api/image-compress",
            TransformKind::ResizeImage => "/api/image-resize",
            TransformKind::ConvertImageFormat => "/api/jpg-png",
            TransformKind::ImageToDocument => "/api/jpg-to-pdf",
            TransformKind::DocumentToImage => "/api/pdf-to-jpg",
            TransformKind::CompressDocument => "/api/compress-pdf",
        }
    }

    /// Multipart field the uploaded file must arrive under.
    pub fn field_name(self) -> &'static str {
        if self.takes_document() {
            "pdf"
        } else {
            "image"
        }
    }

    /// Whether the input is a PDF document rather than a raster image.
    pub fn takes_document(self) -> bool {
        matches!(
            self,
            TransformKind::DocumentToImage | TransformKind::CompressDocument
        )
    }

    /// Operation name used in logs.
    pub fn operation(self) -> &'static str {
        match self {
            TransformKind::CompressImage => "compress-image",
            TransformKind::ResizeImage => "resize-image",
            TransformKind::ConvertImageFormat => "image-format-convert",
            TransformKind::ImageToDocument => "image-to-document",
            TransformKind::DocumentToImage => "document-to-image",
            TransformKind::CompressDocument => "compress-document",
        }
    }

    /// Artifact prefix and extension. Format conversion depends on the upload, see
    /// [`ConvertDirection`].
    pub fn fixed_artifact(self) -> Option<(&'static str, &'static str)> {
        match self {
            TransformKind::CompressImage => Some(("img-compress", "jpg")),
            TransformKind::ResizeImage => Some(("img-resize", "jpg")),
            TransformKind::ConvertImageFormat => None,
            TransformKind::ImageToDocument => Some(("jpg2pdf", "pdf")),
            TransformKind::DocumentToImage => Some(("pdf2jpg", "jpg")),
            TransformKind::CompressDocument => Some(("compressed", "pdf")),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

/// Direction of a jpg/png conversion, sensed from the declared file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertDirection {
    PngToJpg,
    JpgToPng,
}

impl ConvertDirection {
    /// `png` converts to jpg and `jpg`/`jpeg` to png. Anything else has no direction.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(ConvertDirection::PngToJpg),
            "jpg" | "jpeg" => Some(ConvertDirection::JpgToPng),
            _ => None,
        }
    }

    pub fn artifact(self) -> (&'static str, &'static str) {
        match self {
            ConvertDirection::PngToJpg => ("png-to-jpg", "jpg"),
            ConvertDirection::JpgToPng => ("jpg-to-png", "png"),
        }
    }
}

/// Generated name of an output artifact: `<prefix>-<timestamp>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn new(prefix: &str, stamp: u64, extension: &str) -> Self {
        ArtifactName(format!("{}-{}.{}", prefix, stamp, extension))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn download_url(&self) -> String {
        format!("{}/{}", DOWNLOAD_PREFIX, self.0)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Millisecond stamps for artifact names, strictly increasing within the process.
///
/// Two requests landing in the same millisecond get consecutive stamps instead of the
/// same one, so they never target the same output file.
#[derive(Debug, Default)]
pub struct ArtifactClock {
    last: AtomicU64,
}

impl ArtifactClock {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Next stamp, never lower than the wall clock in unix milliseconds.
    pub fn next_stamp(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.next_after(now)
    }

    fn next_after(&self, now: u64) -> u64 {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// Two-outcome result of a transformation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Success { download_url: String },
    Failure,
}

impl TransformOutcome {
    pub fn success(artifact: &ArtifactName) -> Self {
        TransformOutcome::Success {
            download_url: artifact.download_url(),
        }
    }
}

/// Wire form of [`TransformOutcome`]: `{success:true, downloadUrl}` or `{success:false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransformEnvelope {
    pub success: bool,
    #[serde(
        rename = "downloadUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,
}

impl From<TransformOutcome> for TransformEnvelope {
    fn from(outcome: TransformOutcome) -> Self {
        match outcome {
            TransformOutcome::Success { download_url } => TransformEnvelope {
                success: true,
                download_url: Some(download_url),
            },
            TransformOutcome::Failure => TransformEnvelope {
                success: false,
                download_url: None,
            },
        }
    }
}
