//! EasyPDF Processing Library
//!
//! Codec capabilities behind the conversion endpoints. The request pipeline only sees
//! the [`Encoder`] and [`Rasterizer`] traits; the concrete implementations wrap the
//! `image` crate (raster encode/decode), `lopdf` (document assembly) and
//! `pdfium-render` (page rasterization).

pub mod compression;
pub mod document;
pub mod error;
pub mod image;
pub mod traits;
pub mod validator;

pub use compression::{OutputFormat, QualityPreset};
pub use document::{DocumentAssembler, PdfiumRasterizer};
pub use error::{CodecError, CodecResult};
pub use crate::image::ImageCodec;
pub use traits::{DocumentPage, Encoder, PageRect, PageSelection, RasterPage, Rasterizer};
