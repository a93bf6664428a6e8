//! Google Drive client for publishing the inventory export.
//!
//! Provides OAuth token refresh and the three file operations the
//! publisher needs: upload, share publicly, build a download link.

pub mod auth;
pub mod files;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use auth::DriveAuth;
pub use files::{DriveFiles, FileId};

/// Token data for OAuth authentication.
///
/// The caller is responsible for persisting this (e.g. via credential-db).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: i64,
}

/// Unified error type for the drive-client crate.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Access token is not a valid header value")]
    InvalidAccessToken,

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Drive API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// OAuth scope required by this application: access to files it creates.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/drive.file"];

/// Default per-request timeout for Drive and OAuth calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client with a request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, DriveError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Map a reqwest error, surfacing timeouts as [`DriveError::Timeout`].
pub(crate) fn map_send_error(e: reqwest::Error) -> DriveError {
    if e.is_timeout() {
        DriveError::Timeout
    } else {
        DriveError::Http(e)
    }
}
