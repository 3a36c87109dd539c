//! Application state shared by all handlers.

use easypdf_core::{ArtifactClock, Config};
use easypdf_processing::{Encoder, Rasterizer};
use easypdf_storage::Storage;
use std::sync::Arc;

/// Codec capabilities behind the transformation endpoints.
#[derive(Clone)]
pub struct CodecState {
    pub encoder: Arc<dyn Encoder>,
    pub rasterizer: Arc<dyn Rasterizer>,
}

/// The two file namespaces: staged request inputs and published artifacts.
#[derive(Clone)]
pub struct StorageState {
    pub uploads: Arc<dyn Storage>,
    pub output: Arc<dyn Storage>,
}

pub struct AppState {
    pub config: Config,
    pub storage: StorageState,
    pub codecs: CodecState,
    /// Stamps for artifact names; unique for the life of the process.
    pub clock: ArtifactClock,
}

impl AppState {
    pub fn new(config: Config, storage: StorageState, codecs: CodecState) -> Self {
        Self {
            config,
            storage,
            codecs,
            clock: ArtifactClock::new(),
        }
    }
}
