//! Pharmacy product catalog and inventory export.
//!
//! Provides the product catalog, per-unit label payload encoding,
//! price parsing and the JSON export consumed by the mobile POS app.

pub mod catalog;
pub mod export;
pub mod label;
pub mod price;

pub use catalog::{Catalog, ProductRecord};
pub use export::{InventoryExportItem, build_export, write_export};
pub use label::{UnitLabel, encode_unit, product_code, unit_labels};
pub use price::parse_price;

/// Unified error type for the inventory crate.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Invalid price for {product}: {value:?}")]
    InvalidPrice { product: String, value: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
