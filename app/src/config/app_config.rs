//! Runtime application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::{DEFAULT_SETTINGS, get_default};
use super::validation::validate_setting;

/// Runtime configuration for one generation run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub output_dir: PathBuf,
    pub pdf_filename: String,
    pub export_filename: String,
    pub qr_image_dir: String,
    pub currency_prefix: String,
    pub grid_columns: u32,
    pub grid_rows: u32,
    pub font_path: Option<PathBuf>,
    pub clean_output: bool,
    pub publish: PublishConfig,
}

/// Cloud publishing settings.
#[derive(Clone)]
pub struct PublishConfig {
    pub enabled: bool,
    pub client_id: String,
    pub client_secret: String,
    pub folder_id: Option<String>,
    pub timeout: Duration,
    pub link_caption: String,
}

impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("enabled", &self.enabled)
            .field("client_id", &self.client_id)
            .field("client_secret", &mask(&self.client_secret))
            .field("folder_id", &self.folder_id)
            .field("timeout", &self.timeout)
            .field("link_caption", &self.link_caption)
            .finish()
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "********" }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup, falling back to defaults.
    ///
    /// Every value (including defaults) is validated; the first invalid
    /// key aborts loading.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| get_default(key).unwrap_or_default().to_string());
            validate_setting(key, &value)
                .map_err(|e| anyhow::anyhow!("invalid setting {key}={}: {e}", display_value(key, &value)))?;
            Ok(value)
        };

        let font_path = g("FONT_PATH")?;
        let folder_id = g("DRIVE_FOLDER_ID")?;

        Ok(Self {
            catalog_path: PathBuf::from(g("CATALOG_PATH")?),
            output_dir: PathBuf::from(g("OUTPUT_DIR")?),
            pdf_filename: g("PDF_FILENAME")?,
            export_filename: g("EXPORT_FILENAME")?,
            qr_image_dir: g("QR_IMAGE_DIR")?,
            currency_prefix: g("CURRENCY_PREFIX")?,
            grid_columns: g("GRID_COLUMNS")?.parse()?,
            grid_rows: g("GRID_ROWS")?.parse()?,
            font_path: (!font_path.is_empty()).then(|| PathBuf::from(font_path)),
            clean_output: g("CLEAN_OUTPUT")? == "true",
            publish: PublishConfig {
                enabled: g("PUBLISH_ENABLED")? == "true",
                client_id: g("DRIVE_CLIENT_ID")?,
                client_secret: g("DRIVE_CLIENT_SECRET")?,
                folder_id: (!folder_id.is_empty()).then_some(folder_id),
                timeout: Duration::from_secs(g("PUBLISH_TIMEOUT_SECS")?.parse()?),
                link_caption: g("LINK_CAPTION")?,
            },
        })
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir.join(&self.pdf_filename)
    }

    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(&self.export_filename)
    }

    pub fn qr_dir(&self) -> PathBuf {
        self.output_dir.join(&self.qr_image_dir)
    }

    /// Settings that are missing for the enabled features.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.publish.enabled {
            if self.publish.client_id.is_empty() {
                missing.push("DRIVE_CLIENT_ID");
            }
            if self.publish.client_secret.is_empty() {
                missing.push("DRIVE_CLIENT_SECRET");
            }
        }
        missing
    }
}

fn display_value(key: &str, value: &str) -> String {
    match DEFAULT_SETTINGS.get(key) {
        Some(def) if def.secret => mask(value).to_string(),
        _ => format!("{value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> Result<AppConfig, anyhow::Error> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_match_standard_layout() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.grid_columns, 10);
        assert_eq!(config.grid_rows, 10);
        assert_eq!(config.pdf_path(), PathBuf::from("./product_qrcodes.pdf"));
        assert_eq!(config.export_path(), PathBuf::from("./inventory_import.json"));
        assert_eq!(config.qr_dir(), PathBuf::from("./qr_images"));
        assert!(config.clean_output);
        assert!(!config.publish.enabled);
        assert!(config.font_path.is_none());
        assert_eq!(config.publish.timeout, Duration::from_secs(60));
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_map(&[
            ("OUTPUT_DIR", "/tmp/labels"),
            ("GRID_ROWS", " 8 "),
            ("PUBLISH_ENABLED", "true"),
            ("DRIVE_FOLDER_ID", "0AbCdEfGhIjKlMn"),
        ])
        .unwrap();
        assert_eq!(config.grid_rows, 8);
        assert_eq!(config.qr_dir(), PathBuf::from("/tmp/labels/qr_images"));
        assert!(config.publish.enabled);
        assert_eq!(config.publish.folder_id.as_deref(), Some("0AbCdEfGhIjKlMn"));
        assert_eq!(
            config.missing_settings(),
            vec!["DRIVE_CLIENT_ID", "DRIVE_CLIENT_SECRET"]
        );
    }

    #[test]
    fn invalid_value_is_rejected() {
        let err = from_map(&[("GRID_COLUMNS", "99")]).unwrap_err();
        assert!(err.to_string().contains("GRID_COLUMNS"));
    }

    #[test]
    fn secret_is_masked_in_debug_output() {
        let config = from_map(&[("DRIVE_CLIENT_SECRET", "hunter2")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert_eq!(config.publish.client_secret, "hunter2");
    }
}
