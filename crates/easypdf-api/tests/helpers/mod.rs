//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p easypdf-api`.
//!
//! Document routes run against [`RecordingRasterizer`], so the pdfium shared
//! library is not needed.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use easypdf_api::setup::{routes, storage};
use easypdf_api::state::{AppState, CodecState};
use easypdf_core::Config;
use easypdf_processing::{
    CodecError, CodecResult, ImageCodec, PageSelection, RasterPage, Rasterizer,
};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One recorded `rasterize` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterCall {
    pub selection: PageSelection,
    pub scale: f32,
    pub rendered: usize,
}

/// Rasterizer that reads the page count with lopdf and renders blank pages.
#[derive(Debug, Default)]
pub struct RecordingRasterizer {
    calls: Mutex<Vec<RasterCall>>,
    panics: AtomicBool,
}

impl RecordingRasterizer {
    pub fn calls(&self) -> Vec<RasterCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Make every following `rasterize` call panic, as a crashing codec would.
    pub fn set_panics(&self, panics: bool) {
        self.panics.store(panics, Ordering::SeqCst);
    }
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(
        &self,
        data: &[u8],
        selection: PageSelection,
        scale: f32,
    ) -> CodecResult<Vec<RasterPage>> {
        if self.panics.load(Ordering::SeqCst) {
            panic!("rasterizer crashed");
        }
        let document = lopdf::Document::load_mem(data)
            .map_err(|e| CodecError::InvalidDocument(e.to_string()))?;
        let total = document.get_pages().len();
        if total == 0 {
            return Err(CodecError::InvalidDocument("no pages".to_string()));
        }

        let rendered = match selection {
            PageSelection::First => 1,
            PageSelection::All => total,
        };
        self.calls.lock().unwrap().push(RasterCall {
            selection,
            scale,
            rendered,
        });

        let (width, height) = ((61.2 * scale) as u32, (79.2 * scale) as u32);
        Ok((0..rendered)
            .map(|_| RasterPage {
                image: DynamicImage::ImageRgb8(RgbImage::from_pixel(
                    width,
                    height,
                    Rgb([255, 255, 255]),
                )),
                width_pt: 612.0,
                height_pt: 792.0,
            })
            .collect())
    }
}

/// Test application: server plus the directories it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub rasterizer: Arc<RecordingRasterizer>,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn uploads_dir(&self) -> &Path {
        self.config.upload_dir()
    }

    pub fn output_dir(&self) -> &Path {
        self.config.output_dir()
    }

    /// Sorted file names in a directory.
    pub fn list_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read directory")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn output_files(&self) -> Vec<String> {
        Self::list_files(self.output_dir())
    }

    pub fn staged_files(&self) -> Vec<String> {
        Self::list_files(self.uploads_dir())
    }

    /// Read the artifact a `downloadUrl` points at.
    pub fn read_artifact(&self, download_url: &str) -> Vec<u8> {
        let name = download_url
            .strip_prefix("/download/")
            .expect("downloadUrl must start with /download/");
        std::fs::read(self.output_dir().join(name)).expect("Artifact missing on disk")
    }
}

fn write_public_pages(public_dir: &Path) {
    std::fs::create_dir_all(public_dir.join("css")).unwrap();
    std::fs::write(public_dir.join("index.html"), "<h1>EasyPDF</h1>").unwrap();
    std::fs::write(public_dir.join("image-compress.html"), "<h1>Compress</h1>").unwrap();
    std::fs::write(public_dir.join("style.css"), "body {}").unwrap();
    std::fs::write(public_dir.join("css").join("app.css"), "h1 {}").unwrap();
}

/// Setup test app with isolated directories.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, adjusting the configuration first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let root: PathBuf = temp_dir.path().to_path_buf();

    let mut config = Config {
        upload_dir: root.join("uploads"),
        output_dir: root.join("output"),
        public_dir: root.join("public"),
        ..Config::default()
    };
    configure(&mut config);

    write_public_pages(&config.public_dir);

    let storage = storage::setup_storage(&config)
        .await
        .expect("Failed to create local storage");
    let rasterizer = Arc::new(RecordingRasterizer::default());
    let codecs = CodecState {
        encoder: Arc::new(ImageCodec::new()),
        rasterizer: rasterizer.clone(),
    };
    let state = Arc::new(AppState::new(config.clone(), storage, codecs));

    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        rasterizer,
        config,
        _temp_dir: temp_dir,
    }
}
