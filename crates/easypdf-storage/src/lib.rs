//! EasyPDF Storage Library
//!
//! Filesystem namespaces used by the conversion pipeline. The service keeps two of
//! them: `uploads/` for staged request inputs and `output/` for generated artifacts.
//!
//! # Key format
//!
//! Keys are flat file names inside one namespace directory. They must not be empty,
//! contain `..`, or contain a path separator.

pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
