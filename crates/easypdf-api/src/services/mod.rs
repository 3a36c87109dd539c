pub mod pipeline;
pub mod types;

pub use pipeline::{TransformError, TransformService};
