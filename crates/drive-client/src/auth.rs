//! OAuth token management for Google Drive.
//!
//! Handles token refresh and validity checks. The initial authorization
//! (browser consent) happens outside this crate; callers seed a refresh
//! token and let [`DriveAuth`] keep the access token fresh.

use chrono::Utc;
use serde::Deserialize;

use crate::{DriveError, SCOPES, Token, map_send_error};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens expiring within this many seconds are treated as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 5 * 60;

/// Google OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Only present when Google rotates the refresh token.
    refresh_token: Option<String>,
    expires_in: i64,
    scope: Option<String>,
}

/// Google OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Manages Google OAuth token refresh.
///
/// The caller is responsible for persisting tokens.
pub struct DriveAuth {
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl DriveAuth {
    pub fn new(client_id: String, client_secret: String, http: reqwest::Client) -> Self {
        Self {
            client_id,
            client_secret,
            http,
        }
    }

    /// Whether `token` can be used at `now` (unix seconds) without refreshing.
    pub fn is_valid_at(token: &Token, now: i64) -> bool {
        !token.access_token.is_empty() && now < token.expires_at - EXPIRY_MARGIN_SECS
    }

    pub fn is_valid(token: &Token) -> bool {
        Self::is_valid_at(token, Utc::now().timestamp())
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, DriveError> {
        tracing::info!("Refreshing Google OAuth token");

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(DriveError::TokenRefreshFailed(
                "client id and secret are not configured".into(),
            ));
        }

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        let body = resp.text().await?;
        parse_token_response(status.as_u16(), &body, refresh_token, Utc::now().timestamp())
    }
}

/// Parse the token endpoint response into a `Token`.
///
/// `previous_refresh` is carried over when the response does not rotate it.
fn parse_token_response(
    status: u16,
    body: &str,
    previous_refresh: &str,
    now: i64,
) -> Result<Token, DriveError> {
    if !(200..300).contains(&status) {
        let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
            error: Some(status.to_string()),
            error_description: Some(body.to_string()),
        });
        return Err(DriveError::TokenRefreshFailed(format!(
            "{}: {}",
            err.error.unwrap_or_default(),
            err.error_description.unwrap_or_default()
        )));
    }

    let token_resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| DriveError::TokenRefreshFailed(format!("failed to parse response: {e}")))?;

    Ok(Token {
        access_token: token_resp.access_token,
        refresh_token: token_resp
            .refresh_token
            .unwrap_or_else(|| previous_refresh.to_string()),
        scope: token_resp.scope.unwrap_or_else(|| SCOPES.join(" ")),
        expires_at: now + token_resp.expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: i64) -> Token {
        Token {
            access_token: "abc".into(),
            refresh_token: "def".into(),
            scope: SCOPES.join(" "),
            expires_at,
        }
    }

    #[test]
    fn validity_respects_margin() {
        let now = 1_000_000;
        assert!(DriveAuth::is_valid_at(&token(now + 3600), now));
        assert!(!DriveAuth::is_valid_at(&token(now + EXPIRY_MARGIN_SECS), now));
        assert!(!DriveAuth::is_valid_at(&token(now - 1), now));

        let mut empty = token(now + 3600);
        empty.access_token.clear();
        assert!(!DriveAuth::is_valid_at(&empty, now));
    }

    #[test]
    fn parse_keeps_previous_refresh_token() {
        let body = r#"{"access_token":"new","expires_in":3599,"token_type":"Bearer"}"#;
        let t = parse_token_response(200, body, "old-refresh", 100).unwrap();
        assert_eq!(t.access_token, "new");
        assert_eq!(t.refresh_token, "old-refresh");
        assert_eq!(t.expires_at, 3699);
        assert_eq!(t.scope, SCOPES[0]);
    }

    #[test]
    fn parse_takes_rotated_refresh_token() {
        let body = r#"{"access_token":"new","refresh_token":"rotated","expires_in":60,
            "scope":"https://www.googleapis.com/auth/drive.file"}"#;
        let t = parse_token_response(200, body, "old", 0).unwrap();
        assert_eq!(t.refresh_token, "rotated");
    }

    #[test]
    fn parse_reports_oauth_error() {
        let body = r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#;
        let err = parse_token_response(400, body, "old", 0).unwrap_err();
        assert!(err.to_string().contains("invalid_grant"));
    }
}
