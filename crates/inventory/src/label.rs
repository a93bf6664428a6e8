//! Per-unit QR payload encoding.
//!
//! Payload layout is `name|price|manufactureDate|expiryDate|productCode`.
//! Fields are not escaped; a `|` inside a field breaks the layout.

use crate::ProductRecord;

/// Field separator inside the QR payload.
pub const PAYLOAD_SEPARATOR: char = '|';

/// Label data for one physical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLabel {
    pub index: u32,
    pub product_code: String,
    pub payload: String,
}

/// `{prefix}-{index}` with the index zero-padded to three digits.
pub fn product_code(prefix: &str, index: u32) -> String {
    format!("{prefix}-{index:03}")
}

/// Build the label for unit `index` (1-based) of `product`.
pub fn encode_unit(product: &ProductRecord, index: u32) -> UnitLabel {
    let product_code = product_code(&product.code_prefix, index);
    let payload = [
        product.name.as_str(),
        product.price.as_str(),
        &product.manufacture_date.to_string(),
        &product.expiry_date.to_string(),
        &product_code,
    ]
    .join(&PAYLOAD_SEPARATOR.to_string());

    UnitLabel {
        index,
        product_code,
        payload,
    }
}

/// Labels for every unit of `product`, in ascending unit order.
pub fn unit_labels(product: &ProductRecord) -> impl Iterator<Item = UnitLabel> + '_ {
    (1..=product.unit_count).map(move |i| encode_unit(product, i))
}
