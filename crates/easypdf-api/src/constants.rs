//! Route paths shared by the router, handlers and OpenAPI document.

pub use easypdf_core::models::DOWNLOAD_PREFIX;

/// Path of the served OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";
