//! Types passed between pipeline stages

use easypdf_core::{ArtifactName, ConvertDirection, TransformKind};
use easypdf_processing::compression::{PAGE_COMPRESS_SCALE, PAGE_EXPORT_SCALE};
use easypdf_processing::{
    DocumentPage, Encoder, OutputFormat, PageRect, PageSelection, QualityPreset, Rasterizer,
};
use easypdf_processing::{CodecError, CodecResult};

use super::pipeline::TransformError;
use crate::utils::upload::ReceivedUpload;

/// An upload written to the staging namespace.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    /// Key in the uploads storage.
    pub key: String,
    pub original_filename: String,
    pub content_type: String,
    /// Lowercased extension of `original_filename`.
    pub extension: Option<String>,
    pub size: usize,
}

/// Scalar form fields a transformation accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformParams {
    pub width: Option<u32>,
}

impl TransformParams {
    /// Collect the parameters `kind` uses. Fields other kinds use are ignored.
    pub fn from_upload(kind: TransformKind, upload: &ReceivedUpload) -> Result<Self, TransformError> {
        match kind {
            TransformKind::ResizeImage => {
                let raw = upload.field("width").ok_or_else(|| {
                    TransformError::InvalidParameter("width is required".to_string())
                })?;
                Ok(Self {
                    width: Some(parse_width(raw)?),
                })
            }
            _ => Ok(Self::default()),
        }
    }
}

fn parse_width(raw: &str) -> Result<u32, TransformError> {
    match raw.parse::<u32>() {
        Ok(width) if width > 0 => Ok(width),
        _ => Err(TransformError::InvalidParameter(format!(
            "width must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// The codec work for one request, fully decided before the blocking call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformPlan {
    Compress,
    Resize { width: u32 },
    Convert(ConvertDirection),
    ImageToDocument,
    DocumentToImage,
    CompressDocument,
}

impl TransformPlan {
    pub fn new(
        kind: TransformKind,
        params: &TransformParams,
        upload: &StagedUpload,
    ) -> Result<Self, TransformError> {
        let plan = match kind {
            TransformKind::CompressImage => TransformPlan::Compress,
            TransformKind::ResizeImage => TransformPlan::Resize {
                width: params.width.ok_or_else(|| {
                    TransformError::InvalidParameter("width is required".to_string())
                })?,
            },
            TransformKind::ConvertImageFormat => {
                let extension = upload.extension.as_deref().unwrap_or_default();
                let direction = ConvertDirection::from_extension(extension).ok_or_else(|| {
                    TransformError::UnsupportedFormat(format!(
                        "cannot convert '{}' files, expected png, jpg or jpeg",
                        extension
                    ))
                })?;
                TransformPlan::Convert(direction)
            }
            TransformKind::ImageToDocument => TransformPlan::ImageToDocument,
            TransformKind::DocumentToImage => TransformPlan::DocumentToImage,
            TransformKind::CompressDocument => TransformPlan::CompressDocument,
        };
        Ok(plan)
    }

    /// Artifact name for this plan at `stamp`.
    pub fn artifact_name(self, kind: TransformKind, stamp: u64) -> ArtifactName {
        let (prefix, extension) = match self {
            TransformPlan::Convert(direction) => direction.artifact(),
            _ => kind
                .fixed_artifact()
                .unwrap_or(("output", "bin")),
        };
        ArtifactName::new(prefix, stamp, extension)
    }

    /// Run the codec calls. Blocking.
    pub fn apply(
        self,
        encoder: &dyn Encoder,
        rasterizer: &dyn Rasterizer,
        data: &[u8],
    ) -> CodecResult<Vec<u8>> {
        match self {
            TransformPlan::Compress => {
                encoder.compress(data, QualityPreset::Lighter.jpeg_quality())
            }
            TransformPlan::Resize { width } => {
                encoder.resize(data, width, QualityPreset::Normal.jpeg_quality())
            }
            TransformPlan::Convert(ConvertDirection::PngToJpg) => {
                encoder.convert(data, OutputFormat::Jpeg)
            }
            TransformPlan::Convert(ConvertDirection::JpgToPng) => {
                encoder.convert(data, OutputFormat::Png)
            }
            TransformPlan::ImageToDocument => encoder.image_to_document(data),
            TransformPlan::DocumentToImage => {
                let pages = rasterizer.rasterize(data, PageSelection::First, PAGE_EXPORT_SCALE)?;
                let first = pages.first().ok_or_else(|| {
                    CodecError::InvalidDocument("document has no pages".to_string())
                })?;
                encoder.encode_page(first, QualityPreset::Better.jpeg_quality())
            }
            TransformPlan::CompressDocument => {
                let pages = rasterizer.rasterize(data, PageSelection::All, PAGE_COMPRESS_SCALE)?;
                let quality = QualityPreset::Lighter.jpeg_quality();
                let mut document_pages = Vec::with_capacity(pages.len());
                for page in &pages {
                    document_pages.push(DocumentPage {
                        jpeg: encoder.encode_page(page, quality)?,
                        pixel_width: page.image.width(),
                        pixel_height: page.image.height(),
                        width_pt: page.width_pt,
                        height_pt: page.height_pt,
                        placement: PageRect {
                            x: 0.0,
                            y: 0.0,
                            width: page.width_pt,
                            height: page.height_pt,
                        },
                    });
                }
                encoder.assemble_document(&document_pages)
            }
        }
    }
}
