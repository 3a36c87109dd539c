//! `image`-crate implementation of the [`Encoder`] capability

use crate::compression::{ImageCompressor, OutputFormat, QualityPreset};
use crate::document::DocumentAssembler;
use crate::error::{CodecError, CodecResult};
use crate::image::resize::{fit_within, scaled_height};
use crate::traits::{DocumentPage, Encoder, PageRect, RasterPage};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

/// A4 portrait in PDF points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Box an embedded image is scaled to fit on its page.
pub const EMBED_MAX_WIDTH_PT: f32 = 500.0;
pub const EMBED_MAX_HEIGHT_PT: f32 = 700.0;

/// Raster codec backed by the `image` crate, assembling documents with lopdf.
#[derive(Debug, Clone, Default)]
pub struct ImageCodec {
    assembler: DocumentAssembler,
}

impl ImageCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode with the format guessed from the content, not from any filename.
    pub fn decode(data: &[u8]) -> CodecResult<DynamicImage> {
        if data.is_empty() {
            return Err(CodecError::Decode("image data is empty".to_string()));
        }
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(CodecError::UnsupportedFormat(
                "unrecognised image format".to_string(),
            ));
        }
        Ok(reader.decode()?)
    }

    fn page_for_image(img: &DynamicImage, quality: u8) -> CodecResult<DocumentPage> {
        let (pixel_width, pixel_height) = img.dimensions();
        let (width, height) = fit_within(
            pixel_width as f32,
            pixel_height as f32,
            EMBED_MAX_WIDTH_PT,
            EMBED_MAX_HEIGHT_PT,
        );

        Ok(DocumentPage {
            jpeg: ImageCompressor::encode_jpeg(img, quality)?,
            pixel_width,
            pixel_height,
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
            placement: PageRect {
                x: (A4_WIDTH_PT - width) / 2.0,
                y: (A4_HEIGHT_PT - height) / 2.0,
                width,
                height,
            },
        })
    }
}

impl Encoder for ImageCodec {
    fn compress(&self, data: &[u8], quality: u8) -> CodecResult<Vec<u8>> {
        let img = Self::decode(data)?;
        ImageCompressor::encode_jpeg(&img, quality)
    }

    fn resize(&self, data: &[u8], width: u32, quality: u8) -> CodecResult<Vec<u8>> {
        let img = Self::decode(data)?;
        let (original_width, original_height) = img.dimensions();
        let height = scaled_height(original_width, original_height, width)?;

        tracing::debug!(
            original_width,
            original_height,
            width,
            height,
            "Resizing image"
        );

        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        ImageCompressor::encode_jpeg(&resized, quality)
    }

    fn convert(&self, data: &[u8], target: OutputFormat) -> CodecResult<Vec<u8>> {
        let img = Self::decode(data)?;
        ImageCompressor::encode(&img, target, QualityPreset::Better.jpeg_quality())
    }

    fn image_to_document(&self, data: &[u8]) -> CodecResult<Vec<u8>> {
        let img = Self::decode(data)?;
        let page = Self::page_for_image(&img, QualityPreset::Better.jpeg_quality())?;
        self.assembler.assemble(&[page])
    }

    fn encode_page(&self, page: &RasterPage, quality: u8) -> CodecResult<Vec<u8>> {
        ImageCompressor::encode_jpeg(&page.image, quality)
    }

    fn assemble_document(&self, pages: &[DocumentPage]) -> CodecResult<Vec<u8>> {
        self.assembler.assemble(pages)
    }
}
