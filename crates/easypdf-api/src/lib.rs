//! EasyPDF API Library
//!
//! HTTP handlers, the transformation pipeline and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::ErrorResponse;
pub use services::pipeline::TransformError;
