//! Price string parsing.

use crate::InventoryError;

/// Currency prefix stripped from catalog prices by default.
pub const DEFAULT_CURRENCY_PREFIX: &str = "Rs.";

/// Parse a display price such as `Rs. 150` into a number.
///
/// The currency prefix is matched case-sensitively, with or without its
/// trailing dot. Anything left over that is not a finite, non-negative
/// number is rejected.
pub fn parse_price(text: &str, currency_prefix: &str) -> Option<f64> {
    let mut rest = text.trim();
    let bare_prefix = currency_prefix.trim_end_matches('.');

    if !currency_prefix.is_empty() {
        if let Some(stripped) = rest.strip_prefix(currency_prefix) {
            rest = stripped;
        } else if !bare_prefix.is_empty() {
            if let Some(stripped) = rest.strip_prefix(bare_prefix) {
                rest = stripped;
            }
        }
    }

    let value: f64 = rest.trim().replace(',', "").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Like [`parse_price`] but reports which product carried the bad value.
pub(crate) fn require_price(
    product: &str,
    text: &str,
    currency_prefix: &str,
) -> Result<f64, InventoryError> {
    parse_price(text, currency_prefix).ok_or_else(|| InventoryError::InvalidPrice {
        product: product.to_string(),
        value: text.to_string(),
    })
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_prefix() {
        assert_eq!(parse_price("Rs. 150", "Rs."), Some(150.0));
        assert_eq!(parse_price("  Rs.99.50 ", "Rs."), Some(99.5));
        assert_eq!(parse_price("Rs 80", "Rs."), Some(80.0));
        assert_eq!(parse_price("1,250", "Rs."), Some(1250.0));
        assert_eq!(parse_price("$ 3.25", "$"), Some(3.25));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(parse_price("Rs. abc", "Rs."), None);
        assert_eq!(parse_price("", "Rs."), None);
        assert_eq!(parse_price("Rs. inf", "Rs."), None);
        assert_eq!(parse_price("Rs. -5", "Rs."), None);
        assert_eq!(parse_price("USD 5", "Rs."), None);
    }

    #[test]
    fn require_price_names_the_product() {
        let err = require_price("Azee", "free", "Rs.").unwrap_err();
        assert!(err.to_string().contains("Azee"));
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(150.0 * 0.8), 120.0);
        assert_eq!(round_cents(99.99 * 0.8), 79.99);
    }
}
