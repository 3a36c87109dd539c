//! Configuration module
//!
//! Process-wide settings for the conversion service: listening port, the staging and
//! artifact directories, upload limits and codec library location. Everything is read
//! from the environment once at startup and passed around explicitly.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub public_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    /// Directory holding the pdfium shared library. `None` binds to the system library.
    pub pdfium_library_path: Option<PathBuf>,
    /// Keep staged uploads on disk when a transformation fails.
    pub retain_failed_uploads: bool,
    /// Absolute origin advertised in robots.txt, e.g. `https://easypdf.example`.
    pub site_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            public_dir: PathBuf::from("public"),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            pdfium_library_path: None,
            retain_failed_uploads: true,
            site_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let http_concurrency_limit = env::var("HTTP_CONCURRENCY_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(HTTP_CONCURRENCY_LIMIT)
            .max(1);

        let retain_failed_uploads = env::var("RETAIN_FAILED_UPLOADS")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        let config = Config {
            server_port,
            upload_dir: env_path("UPLOAD_DIR", "uploads"),
            output_dir: env_path("OUTPUT_DIR", "output"),
            public_dir: env_path("PUBLIC_DIR", "public"),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            cors_origins,
            environment,
            http_concurrency_limit,
            pdfium_library_path: env::var("PDFIUM_LIBRARY_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            retain_failed_uploads,
            site_url: env::var("SITE_URL")
                .ok()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_dir == self.output_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and OUTPUT_DIR must be different directories"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.http_concurrency_limit
    }

    pub fn pdfium_library_path(&self) -> Option<&Path> {
        self.pdfium_library_path.as_deref()
    }

    pub fn retain_failed_uploads(&self) -> bool {
        self.retain_failed_uploads
    }

    pub fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref()
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
