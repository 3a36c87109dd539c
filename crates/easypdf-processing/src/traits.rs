//! Codec capability traits
//!
//! Calls are synchronous and CPU-bound. Async callers run them on the blocking pool.

use crate::compression::OutputFormat;
use crate::error::CodecResult;
use image::DynamicImage;

/// Which pages of a document to rasterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    First,
    All,
}

/// One rasterized document page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    pub image: DynamicImage,
    /// Page size in PDF points (1/72 inch).
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Placement of an image on a page, in PDF points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One page of a document to assemble: a JPEG drawn at `placement` on a page of the
/// given size.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    pub jpeg: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub width_pt: f32,
    pub height_pt: f32,
    pub placement: PageRect,
}

/// Raster image encoding and document assembly.
pub trait Encoder: Send + Sync {
    /// Re-encode an image as JPEG at `quality`.
    fn compress(&self, data: &[u8], quality: u8) -> CodecResult<Vec<u8>>;

    /// Scale an image to `width` pixels, preserving aspect ratio, and encode as JPEG.
    fn resize(&self, data: &[u8], width: u32, quality: u8) -> CodecResult<Vec<u8>>;

    /// Re-encode an image in `target` format.
    fn convert(&self, data: &[u8], target: OutputFormat) -> CodecResult<Vec<u8>>;

    /// Embed an image as the single page of a new PDF.
    fn image_to_document(&self, data: &[u8]) -> CodecResult<Vec<u8>>;

    /// Encode a rasterized page as JPEG at `quality`.
    fn encode_page(&self, page: &RasterPage, quality: u8) -> CodecResult<Vec<u8>>;

    /// Build a new PDF with one page per entry.
    fn assemble_document(&self, pages: &[DocumentPage]) -> CodecResult<Vec<u8>>;
}

/// PDF page rendering.
pub trait Rasterizer: Send + Sync {
    /// Render the selected pages of `data` at `scale` times their point size.
    fn rasterize(
        &self,
        data: &[u8],
        selection: PageSelection,
        scale: f32,
    ) -> CodecResult<Vec<RasterPage>>;
}
