//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, bool, &'static str);

const DEFS: &[DefTuple] = &[
    ("CATALOG_PATH", "catalog.json", false, "Product catalog JSON file"),
    ("OUTPUT_DIR", ".", false, "Directory receiving the PDF, export and images"),
    ("PDF_FILENAME", "product_qrcodes.pdf", false, "Label sheet file name"),
    ("EXPORT_FILENAME", "inventory_import.json", false, "Inventory export file name"),
    ("QR_IMAGE_DIR", "qr_images", false, "Subdirectory for per-unit QR PNGs"),
    ("CURRENCY_PREFIX", "Rs.", false, "Currency prefix stripped from prices"),
    ("GRID_COLUMNS", "10", false, "Labels per row"),
    ("GRID_ROWS", "10", false, "Label rows per page"),
    ("FONT_PATH", "", false, "TTF/OTF font for raster captions"),
    ("CLEAN_OUTPUT", "true", false, "Clear the QR image directory before each run"),
    ("PUBLISH_ENABLED", "false", false, "Upload the export to Google Drive"),
    ("DRIVE_CLIENT_ID", "", false, "Google OAuth client id"),
    ("DRIVE_CLIENT_SECRET", "", true, "Google OAuth client secret"),
    ("DRIVE_FOLDER_ID", "", false, "Drive folder receiving uploads"),
    ("PUBLISH_TIMEOUT_SECS", "60", false, "Deadline for the whole publish step"),
    ("LINK_CAPTION", "Scan to import inventory", false, "Caption under the export link QR"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting definitions in declaration order.
pub fn all() -> impl Iterator<Item = &'static SettingDef> {
    DEFS.iter().filter_map(|(key, ..)| DEFAULT_SETTINGS.get(key))
}
