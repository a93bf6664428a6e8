//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_CLIENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z\-]+\.apps\.googleusercontent\.com$").unwrap());
static RE_DRIVE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_\-]{10,}$").unwrap());
static RE_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/\\:*?<>|]+\.[A-Za-z0-9]+$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "GRID_COLUMNS" | "GRID_ROWS" => validate_int_range(value, 1, 20)?,
        "PUBLISH_TIMEOUT_SECS" => validate_int_range(value, 5, 600)?,
        "PDF_FILENAME" | "EXPORT_FILENAME" => {
            if !RE_FILE_NAME.is_match(value) {
                return Err("must be a plain file name with an extension".into());
            }
        }
        "QR_IMAGE_DIR" => {
            if value.is_empty() || value.contains("..") {
                return Err("must be a non-empty relative directory name".into());
            }
        }
        "DRIVE_CLIENT_ID" => {
            if !value.is_empty() && !RE_CLIENT_ID.is_match(value) {
                return Err("expected '<id>.apps.googleusercontent.com'".into());
            }
        }
        "DRIVE_FOLDER_ID" => {
            if !value.is_empty() && !RE_DRIVE_ID.is_match(value) {
                return Err("invalid Drive folder id".into());
            }
        }
        "LINK_CAPTION" => {
            if value.chars().count() > 64 {
                return Err("caption must be at most 64 characters".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "CLEAN_OUTPUT" | "PUBLISH_ENABLED")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("PUBLISH_ENABLED", "true").is_ok());
        assert!(validate_setting("CLEAN_OUTPUT", "false").is_ok());
        assert!(validate_setting("CLEAN_OUTPUT", "yes").is_err());
    }

    #[test]
    fn test_grid_range() {
        assert!(validate_setting("GRID_COLUMNS", "10").is_ok());
        assert!(validate_setting("GRID_ROWS", "0").is_err());
        assert!(validate_setting("GRID_ROWS", "21").is_err());
        assert!(validate_setting("GRID_ROWS", "ten").is_err());
    }

    #[test]
    fn test_client_id() {
        assert!(validate_setting("DRIVE_CLIENT_ID", "").is_ok());
        assert!(validate_setting("DRIVE_CLIENT_ID", "1234-abcd.apps.googleusercontent.com").is_ok());
        assert!(validate_setting("DRIVE_CLIENT_ID", "not-a-client").is_err());
    }

    #[test]
    fn test_file_names() {
        assert!(validate_setting("PDF_FILENAME", "labels.pdf").is_ok());
        assert!(validate_setting("PDF_FILENAME", "../labels.pdf").is_err());
        assert!(validate_setting("EXPORT_FILENAME", "export").is_err());
        assert!(validate_setting("QR_IMAGE_DIR", "../up").is_err());
    }
}
