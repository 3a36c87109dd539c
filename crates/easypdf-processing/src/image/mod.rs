//! Image processing module
//!
//! - Width-driven resizing and box fitting (resize)
//! - The `image`-crate implementation of [`Encoder`](crate::Encoder) (codec)

pub mod codec;
pub mod resize;

pub use codec::ImageCodec;
pub use resize::{ensure_pixel_budget, fit_within, scaled_height, MAX_OUTPUT_PIXELS};
