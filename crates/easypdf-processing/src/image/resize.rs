//! Dimension arithmetic for resizing and page fitting

use crate::error::{CodecError, CodecResult};

/// Largest image a single transformation may produce, in pixels.
pub const MAX_OUTPUT_PIXELS: u64 = 40_000_000;

/// Reject output dimensions whose pixel buffer would exceed [`MAX_OUTPUT_PIXELS`].
/// Must run before anything allocates the output.
pub fn ensure_pixel_budget(width: u64, height: u64) -> CodecResult<()> {
    match width.checked_mul(height) {
        Some(pixels) if pixels <= MAX_OUTPUT_PIXELS => Ok(()),
        _ => Err(CodecError::InvalidParameter(format!(
            "output of {}x{} pixels exceeds the limit of {} pixels",
            width, height, MAX_OUTPUT_PIXELS
        ))),
    }
}

/// Height that keeps the aspect ratio of a `width` × `height` image scaled to
/// `target_width`. Rounds to the nearest pixel and never returns zero. Fails when
/// the scaled image would be over the pixel budget.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> CodecResult<u32> {
    if target_width == 0 {
        return Err(CodecError::InvalidParameter(
            "width must be a positive integer".to_string(),
        ));
    }
    if width == 0 || height == 0 {
        return Err(CodecError::Decode("image has zero dimensions".to_string()));
    }

    let scaled = (height as f64 * target_width as f64 / width as f64).round();
    if scaled > u32::MAX as f64 {
        return Err(CodecError::InvalidParameter(format!(
            "width {} gives an unrepresentable height",
            target_width
        )));
    }
    let scaled = (scaled as u32).max(1);
    ensure_pixel_budget(target_width as u64, scaled as u64)?;
    Ok(scaled)
}

/// Scale `width` × `height` to the largest size that fits inside
/// `max_width` × `max_height` while keeping the aspect ratio.
pub fn fit_within(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (max_width / width).min(max_height / height);
    (width * scale, height * scale)
}
