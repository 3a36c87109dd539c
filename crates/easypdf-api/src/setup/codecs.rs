use crate::state::CodecState;
use easypdf_core::Config;
use easypdf_processing::{ImageCodec, PdfiumRasterizer};
use std::sync::Arc;

/// Build the production codecs. A missing pdfium library is logged, not fatal:
/// only the PDF rasterizing endpoints depend on it.
pub fn setup_codecs(config: &Config) -> CodecState {
    let rasterizer = PdfiumRasterizer::new(config.pdfium_library_path().map(|p| p.to_path_buf()));

    match rasterizer.probe() {
        Ok(()) => tracing::info!("pdfium library bound"),
        Err(e) => tracing::warn!(
            error = %e,
            "pdfium library unavailable; /api/pdf-to-jpg and /api/compress-pdf will fail"
        ),
    }

    CodecState {
        encoder: Arc::new(ImageCodec::new()),
        rasterizer: Arc::new(rasterizer),
    }
}
