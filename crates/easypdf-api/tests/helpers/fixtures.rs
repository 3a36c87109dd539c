//! Test fixtures: encoded images and multi-page PDFs.

use easypdf_processing::{DocumentAssembler, DocumentPage, PageRect};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture image");
    buffer
}

/// Opaque RGB JPEG of the given size.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([180, 60, 30]))),
        ImageFormat::Jpeg,
    )
}

/// RGBA PNG of the given size with a translucent fill.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([20, 90, 200, 128]))),
        ImageFormat::Png,
    )
}

pub fn create_test_gif(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))),
        ImageFormat::Gif,
    )
}

/// Valid PDF with `pages` US-Letter pages, each drawing a small JPEG.
pub fn create_test_pdf(pages: usize) -> Vec<u8> {
    let jpeg = create_test_jpeg(16, 16);
    let page = DocumentPage {
        jpeg,
        pixel_width: 16,
        pixel_height: 16,
        width_pt: 612.0,
        height_pt: 792.0,
        placement: PageRect {
            x: 0.0,
            y: 0.0,
            width: 612.0,
            height: 792.0,
        },
    };
    DocumentAssembler::new()
        .assemble(&vec![page; pages])
        .expect("Failed to assemble fixture PDF")
}

/// Number of pages lopdf finds in `pdf`.
pub fn pdf_page_count(pdf: &[u8]) -> usize {
    lopdf::Document::load_mem(pdf)
        .expect("Artifact is not a readable PDF")
        .get_pages()
        .len()
}
