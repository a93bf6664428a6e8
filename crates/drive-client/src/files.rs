//! Drive v3 file operations: multipart upload, public sharing, download URL.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{DriveError, Token, map_send_error};

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DOWNLOAD_URL: &str = "https://drive.google.com/uc";

/// Identifier Drive assigns to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parents: Option<Vec<&'a str>>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct PermissionRequest<'a> {
    role: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Drive file client with Bearer token injection.
pub struct DriveFiles {
    http: reqwest::Client,
    folder_id: Option<String>,
}

impl DriveFiles {
    /// `folder_id` places uploads in that folder; `None` uploads to My Drive root.
    pub fn new(http: reqwest::Client, folder_id: Option<String>) -> Self {
        Self {
            http,
            folder_id: folder_id.filter(|f| !f.is_empty()),
        }
    }

    fn auth_headers(token: &Token) -> Result<HeaderMap, DriveError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|_| DriveError::InvalidAccessToken)?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Upload `bytes` as a new file named `name`. Returns the new file's id.
    pub async fn upload_file(
        &self,
        token: &Token,
        bytes: Vec<u8>,
        name: &str,
        mime_type: &str,
    ) -> Result<FileId, DriveError> {
        let metadata = FileMetadata {
            name,
            mime_type,
            parents: self.folder_id.as_deref().map(|f| vec![f]),
        };
        let boundary = format!("pharma-labels-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &serde_json::to_vec(&metadata)?, mime_type, &bytes);

        let mut url = Url::parse(UPLOAD_URL)?;
        url.query_pairs_mut()
            .append_pair("uploadType", "multipart")
            .append_pair("fields", "id");

        let mut headers = Self::auth_headers(token)?;
        let content_type = HeaderValue::from_str(&format!("multipart/related; boundary={boundary}"))
            .map_err(|e| DriveError::ApiError {
                status: 0,
                message: e.to_string(),
            })?;
        headers.insert(CONTENT_TYPE, content_type);

        tracing::info!(name, size = bytes.len(), "Uploading file to Drive");
        let resp = self
            .http
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let body = check_status(resp).await?;
        let parsed: UploadResponse = serde_json::from_str(&body)?;
        Ok(FileId(parsed.id))
    }

    /// Grant read access to anyone with the link.
    pub async fn set_public_read(&self, token: &Token, file_id: &FileId) -> Result<(), DriveError> {
        let url = permissions_url(file_id)?;
        let resp = self
            .http
            .post(url)
            .headers(Self::auth_headers(token)?)
            .json(&PermissionRequest {
                role: "reader",
                kind: "anyone",
            })
            .send()
            .await
            .map_err(map_send_error)?;

        check_status(resp).await?;
        tracing::info!(file_id = %file_id, "File shared publicly");
        Ok(())
    }

    /// Direct-download URL for a publicly readable file.
    pub fn download_url(file_id: &FileId) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("export", "download")
            .append_pair("id", &file_id.0)
            .finish();
        format!("{DOWNLOAD_URL}?{query}")
    }
}

fn permissions_url(file_id: &FileId) -> Result<Url, DriveError> {
    let mut url = Url::parse(FILES_URL)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .push(&file_id.0)
        .push("permissions");
    Ok(url)
}

async fn check_status(resp: reqwest::Response) -> Result<String, DriveError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(DriveError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(body)
}

/// Build a `multipart/related` body: JSON metadata part, then the media part.
fn multipart_related_body(boundary: &str, metadata: &[u8], mime_type: &str, media: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata.len() + media.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_in_access_token_are_rejected() {
        let token = Token {
            access_token: "bad\ntoken".into(),
            refresh_token: String::new(),
            scope: String::new(),
            expires_at: 0,
        };
        let err = DriveFiles::auth_headers(&token).unwrap_err();
        assert!(matches!(err, DriveError::InvalidAccessToken));
    }

    #[test]
    fn download_url_uses_export_download() {
        let url = DriveFiles::download_url(&FileId("1AbC_d-9".into()));
        assert_eq!(url, "https://drive.google.com/uc?export=download&id=1AbC_d-9");
    }

    #[test]
    fn permissions_url_escapes_id() {
        let url = permissions_url(&FileId("a/b".into())).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/drive/v3/files/a%2Fb/permissions"
        );
    }

    #[test]
    fn multipart_body_has_both_parts() {
        let body = multipart_related_body("B", br#"{"name":"x.json"}"#, "application/json", b"[1,2]");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--B\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n"));
        assert!(text.contains("{\"name\":\"x.json\"}\r\n--B\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n\r\n[1,2]\r\n--B--\r\n"));
    }

    #[test]
    fn metadata_includes_parent_folder_only_when_set() {
        let with_parent = FileMetadata {
            name: "inventory_import.json",
            mime_type: "application/json",
            parents: Some(vec!["folder123"]),
        };
        let json = serde_json::to_value(&with_parent).unwrap();
        assert_eq!(json["parents"][0], "folder123");
        assert_eq!(json["mimeType"], "application/json");

        let files = DriveFiles::new(reqwest::Client::new(), Some(String::new()));
        assert!(files.folder_id.is_none());
    }

    #[test]
    fn upload_response_parses_id() {
        let parsed: UploadResponse = serde_json::from_str(r#"{"id":"abc123"}"#).unwrap();
        assert_eq!(FileId(parsed.id).to_string(), "abc123");
    }
}
