//! Document processing module

pub mod assembler;
pub mod rasterizer;

pub use assembler::DocumentAssembler;
pub use rasterizer::PdfiumRasterizer;
