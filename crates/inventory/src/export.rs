//! Inventory export for the mobile POS import screen.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::price::{require_price, round_cents};
use crate::{Catalog, InventoryError, label};

/// Wholesale price as a fraction of retail.
pub const WHOLESALE_RATIO: f64 = 0.8;

/// Stock quantity recorded per labelled unit.
pub const UNIT_QUANTITY: u32 = 1;

/// Low-stock warning level the POS app starts with.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// One normalized inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryExportItem {
    pub product_code: String,
    pub name: String,
    pub price: f64,
    pub wholesale_price: f64,
    pub quantity: u32,
    pub low_stock_threshold: u32,
    pub category: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Build one export item per unit, in catalog order then unit order.
///
/// Every price is parsed before anything is returned, so a single bad
/// price fails the whole export.
pub fn build_export(
    catalog: &Catalog,
    created_at: NaiveDateTime,
    currency_prefix: &str,
) -> Result<Vec<InventoryExportItem>, InventoryError> {
    let mut items = Vec::with_capacity(catalog.total_units());

    for product in &catalog.products {
        let price = require_price(&product.name, &product.price, currency_prefix)?;
        let wholesale_price = round_cents(price * WHOLESALE_RATIO);

        for unit in label::unit_labels(product) {
            items.push(InventoryExportItem {
                product_code: unit.product_code,
                name: product.name.clone(),
                price,
                wholesale_price,
                quantity: UNIT_QUANTITY,
                low_stock_threshold: LOW_STOCK_THRESHOLD,
                category: product.category.clone(),
                manufacture_date: product.manufacture_date,
                expiry_date: product.expiry_date,
                created_at,
            });
        }
    }

    Ok(items)
}

/// Write items as indented UTF-8 JSON, replacing any previous file.
pub fn write_export(
    path: impl AsRef<Path>,
    items: &[InventoryExportItem],
) -> Result<(), InventoryError> {
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(
        path = %path.as_ref().display(),
        items = items.len(),
        "Inventory export written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductRecord;

    fn created_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn product(prefix: &str, price: &str, count: u32) -> ProductRecord {
        ProductRecord {
            name: format!("{prefix} tablets"),
            price: price.into(),
            manufacture_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            code_prefix: prefix.into(),
            unit_count: count,
            category: "PHARMA".into(),
        }
    }

    #[test]
    fn items_follow_catalog_then_unit_order() {
        let catalog = Catalog::new(vec![product("X", "Rs. 10", 3), product("Y", "Rs. 20", 2)]);
        let items = build_export(&catalog, created_at(), "Rs.").unwrap();

        let codes: Vec<_> = items.iter().map(|i| i.product_code.as_str()).collect();
        assert_eq!(codes, ["X-001", "X-002", "X-003", "Y-001", "Y-002"]);
    }

    #[test]
    fn item_count_matches_total_units() {
        let catalog = Catalog::sample();
        let items = build_export(&catalog, created_at(), "Rs.").unwrap();
        assert_eq!(items.len(), catalog.total_units());
    }

    #[test]
    fn wholesale_is_eighty_percent_of_retail() {
        let catalog = Catalog::new(vec![product("A", "Rs. 150", 1), product("B", "Rs. 99.99", 1)]);
        let items = build_export(&catalog, created_at(), "Rs.").unwrap();

        assert_eq!(items[0].price, 150.0);
        assert_eq!(items[0].wholesale_price, 120.0);
        assert_eq!(items[1].wholesale_price, 79.99);
        assert!(items.iter().all(|i| i.quantity == 1 && i.low_stock_threshold == 10));
    }

    #[test]
    fn bad_price_fails_whole_export() {
        let catalog = Catalog::new(vec![product("A", "Rs. 150", 2), product("B", "ask", 1)]);
        let err = build_export(&catalog, created_at(), "Rs.").unwrap_err();
        assert!(matches!(err, InventoryError::InvalidPrice { .. }));
    }

    #[test]
    fn serialized_field_names_match_import_format() {
        let catalog = Catalog::new(vec![product("X", "Rs. 10", 1)]);
        let items = build_export(&catalog, created_at(), "Rs.").unwrap();
        let value = serde_json::to_value(&items[0]).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "productCode",
            "name",
            "price",
            "wholesalePrice",
            "quantity",
            "lowStockThreshold",
            "category",
            "manufactureDate",
            "expiryDate",
            "createdAt",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["manufactureDate"], "2025-01-01");
        assert_eq!(obj["createdAt"], "2025-08-01T09:30:00");
    }

    #[test]
    fn write_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory_import.json");
        std::fs::write(&path, "x".repeat(100_000)).unwrap();

        let catalog = Catalog::new(vec![product("X", "Rs. 10", 2)]);
        let items = build_export(&catalog, created_at(), "Rs.").unwrap();
        write_export(&path, &items).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {"));
        let parsed: Vec<InventoryExportItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, items);
    }
}
