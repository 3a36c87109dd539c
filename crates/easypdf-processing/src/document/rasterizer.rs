//! PDF page rasterization via pdfium
//!
//! pdfium is a C library with global state; `pdfium-render` serializes access behind
//! its `thread_safe` feature. Every call here is blocking and belongs on the blocking
//! pool.

use crate::error::{CodecError, CodecResult};
use crate::image::ensure_pixel_budget;
use crate::traits::{PageSelection, RasterPage, Rasterizer};
use crate::validator::looks_like_pdf;
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// [`Rasterizer`] backed by a dynamically loaded pdfium library.
///
/// The library is bound on each call, so a host without pdfium still starts and
/// only the document endpoints fail.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_path: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// `library_path` is the directory holding the pdfium shared library. `None`
    /// falls back to the system library search path.
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self { library_path }
    }

    /// Check that the library can be bound.
    pub fn probe(&self) -> CodecResult<()> {
        self.bind().map(drop)
    }

    fn bind(&self) -> CodecResult<Pdfium> {
        let bindings = match &self.library_path {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| CodecError::LibraryUnavailable(format!("{:?}", e)))?;

        Ok(Pdfium::new(bindings))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        data: &[u8],
        selection: PageSelection,
        scale: f32,
    ) -> CodecResult<Vec<RasterPage>> {
        if !looks_like_pdf(data) {
            return Err(CodecError::InvalidDocument(
                "missing PDF header".to_string(),
            ));
        }
        if !(scale > 0.0) {
            return Err(CodecError::InvalidParameter(format!(
                "render scale must be positive, got {}",
                scale
            )));
        }

        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| CodecError::InvalidDocument(format!("{:?}", e)))?;

        let pages = document.pages();
        let total = pages.len() as usize;
        if total == 0 {
            return Err(CodecError::InvalidDocument(
                "document has no pages".to_string(),
            ));
        }

        let count = match selection {
            PageSelection::First => 1,
            PageSelection::All => total,
        };
        tracing::debug!(total_pages = total, rendering = count, scale, "Rasterizing PDF");

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let mut rendered = Vec::with_capacity(count);

        for index in 0..count {
            let page = pages
                .get(index as u16)
                .map_err(|e| CodecError::Rasterize {
                    page: index + 1,
                    detail: format!("{:?}", e),
                })?;

            let width_pt = page.width().value;
            let height_pt = page.height().value;
            check_render_size(index, width_pt, height_pt, scale)?;

            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| CodecError::Rasterize {
                    page: index + 1,
                    detail: format!("{:?}", e),
                })?;

            rendered.push(RasterPage {
                image: bitmap.as_image(),
                width_pt,
                height_pt,
            });
        }

        Ok(rendered)
    }
}

/// Fail before rendering when a page at `scale` would exceed the pixel budget.
fn check_render_size(index: usize, width_pt: f32, height_pt: f32, scale: f32) -> CodecResult<()> {
    let width_px = (width_pt * scale).ceil();
    let height_px = (height_pt * scale).ceil();
    if !(width_px.is_finite() && height_px.is_finite()) || width_px < 0.0 || height_px < 0.0 {
        return Err(CodecError::InvalidDocument(format!(
            "page {} has an invalid size",
            index + 1
        )));
    }
    ensure_pixel_budget(width_px as u64, height_px as u64)
}
