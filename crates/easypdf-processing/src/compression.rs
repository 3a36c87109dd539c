use crate::error::{CodecError, CodecResult};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::DynamicImage;

/// Quality presets for the JPEG outputs of each transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    /// Compression endpoints (images and rasterized PDF pages)
    Lighter,
    /// Resized images
    #[default]
    Normal,
    /// Format conversion, PDF page export and images embedded into PDFs
    Better,
}

impl QualityPreset {
    /// Get quality value for JPEG (0-100)
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Lighter => 60,
            QualityPreset::Normal => 80,
            QualityPreset::Better => 90,
        }
    }
}

/// Render scale for a PDF page exported as an image.
pub const PAGE_EXPORT_SCALE: f32 = 2.0;

/// Render scale for pages of a compressed PDF.
pub const PAGE_COMPRESS_SCALE: f32 = 1.0;

/// Output format for re-encoded images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

/// Image encoder for the supported output formats
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode as JPEG. JPEG has no alpha channel, so the image is flattened to RGB8.
    pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> CodecResult<Vec<u8>> {
        let quality = quality.clamp(1, 100);
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut buffer = Vec::with_capacity((rgb.width() * rgb.height()) as usize / 4);
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer)
    }

    /// Encode as PNG (lossless, default compression).
    pub fn encode_png(img: &DynamicImage) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        img.write_with_encoder(PngEncoder::new(&mut buffer))
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer)
    }

    /// Encode in `format`. JPEG uses `quality`; PNG ignores it.
    pub fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> CodecResult<Vec<u8>> {
        match format {
            OutputFormat::Jpeg => Self::encode_jpeg(img, quality),
            OutputFormat::Png => Self::encode_png(img),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn transparent_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([10, 200, 30, 128])))
    }

    #[test]
    fn test_quality_presets() {
        assert_eq!(QualityPreset::Lighter.jpeg_quality(), 60);
        assert_eq!(QualityPreset::Normal.jpeg_quality(), 80);
        assert_eq!(QualityPreset::Better.jpeg_quality(), 90);
        assert_eq!(QualityPreset::default(), QualityPreset::Normal);
    }

    #[test]
    fn test_encode_jpeg_flattens_alpha() {
        let bytes = ImageCompressor::encode_jpeg(&transparent_image(), 60).unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let bytes = ImageCompressor::encode(&transparent_image(), OutputFormat::Png, 0).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }
}
