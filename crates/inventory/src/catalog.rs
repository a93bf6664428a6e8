//! Product catalog loaded from a JSON file.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::InventoryError;

/// Category assigned when a catalog entry does not name one.
pub const DEFAULT_CATEGORY: &str = "PHARMA";

/// A product line with the number of physical units that need labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    /// Price exactly as printed on the label, e.g. `Rs. 150`.
    pub price: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub code_prefix: String,
    pub unit_count: u32,
    #[serde(default = "default_category")]
    pub category: String,
}

/// Product codes name the per-unit PNG files, so a prefix must not
/// contain path separators, parent references or reserved characters.
fn is_file_name_safe(prefix: &str) -> bool {
    const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    !prefix.starts_with('.')
        && !prefix.contains("..")
        && !prefix.chars().any(|c| c.is_control() || RESERVED.contains(&c))
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Ordered list of products fed into the label and export pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self { products }
    }

    /// Load and validate a catalog from a JSON file.
    ///
    /// Accepts either `{"products": [...]}` or a bare array of products.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.as_ref().display(),
            products = catalog.products.len(),
            units = catalog.total_units(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, InventoryError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CatalogFile {
            Wrapped(Catalog),
            Bare(Vec<ProductRecord>),
        }

        let catalog = match serde_json::from_str::<CatalogFile>(raw)? {
            CatalogFile::Wrapped(c) => c,
            CatalogFile::Bare(products) => Catalog::new(products),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Write the catalog as indented JSON, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), InventoryError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject catalogs the pipeline cannot lay out. Suspicious but
    /// workable entries are only logged.
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.products.is_empty() {
            return Err(InventoryError::InvalidCatalog("no products".into()));
        }

        let mut prefixes = HashSet::new();
        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(InventoryError::InvalidCatalog(
                    "product name must not be empty".into(),
                ));
            }
            if product.code_prefix.trim().is_empty() {
                return Err(InventoryError::InvalidCatalog(format!(
                    "{}: code prefix must not be empty",
                    product.name
                )));
            }
            if !is_file_name_safe(&product.code_prefix) {
                return Err(InventoryError::InvalidCatalog(format!(
                    "{}: code prefix {:?} cannot be used in a file name",
                    product.name, product.code_prefix
                )));
            }
            if product.unit_count == 0 {
                return Err(InventoryError::InvalidCatalog(format!(
                    "{}: unit count must be at least 1",
                    product.name
                )));
            }
            if product.name.contains('|') || product.price.contains('|') {
                tracing::warn!(
                    product = %product.name,
                    "Field contains '|' and will corrupt the QR payload"
                );
            }
            if product.expiry_date < product.manufacture_date {
                tracing::warn!(
                    product = %product.name,
                    mfd = %product.manufacture_date,
                    exp = %product.expiry_date,
                    "Expiry date precedes manufacture date"
                );
            }
            if !prefixes.insert(product.code_prefix.as_str()) {
                tracing::warn!(
                    prefix = %product.code_prefix,
                    "Duplicate code prefix, product codes will collide"
                );
            }
        }
        Ok(())
    }

    pub fn total_units(&self) -> usize {
        self.products.iter().map(|p| p.unit_count as usize).sum()
    }

    /// The sample catalog used when no catalog file is configured.
    pub fn sample() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        let product = |name: &str, price: &str, mfd, exp, prefix: &str, count| ProductRecord {
            name: name.into(),
            price: price.into(),
            manufacture_date: mfd,
            expiry_date: exp,
            code_prefix: prefix.into(),
            unit_count: count,
            category: default_category(),
        };

        Self::new(vec![
            product(
                "Rapidene 500mg",
                "Rs. 150",
                date(2025, 7, 15),
                date(2027, 1, 15),
                "RAPIDENE",
                10,
            ),
            product(
                "Bisoprolol 2.5mg",
                "Rs. 350",
                date(2025, 5, 10),
                date(2026, 5, 10),
                "BISOPROLOL",
                5,
            ),
            product(
                "Domperidone 500mg",
                "Rs. 150",
                date(2025, 6, 8),
                date(2026, 6, 8),
                "DOMPERIDONE",
                8,
            ),
            product(
                "Azee 500mg",
                "Rs. 400",
                date(2025, 7, 25),
                date(2027, 6, 25),
                "AZEE",
                6,
            ),
            product(
                "Pantonix 20mg",
                "Rs. 180",
                date(2025, 6, 20),
                date(2026, 6, 20),
                "PANTONIX",
                7,
            ),
        ])
    }
}
