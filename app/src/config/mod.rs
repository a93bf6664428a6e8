//! Configuration management: defaults, validation, loading from environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

use std::path::PathBuf;

pub use app_config::{AppConfig, PublishConfig};

/// Determine the data directory holding the credential database.
/// Priority: PHARMA_LABELS_DATA_DIR env var > ~/.pharma-labels
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PHARMA_LABELS_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pharma-labels")
}

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
