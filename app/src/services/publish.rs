//! Optional cloud publishing of the inventory export.
//!
//! The export file is uploaded, shared with anyone holding the link, and a
//! QR symbol pointing at the direct download is written next to it. Any
//! failure here leaves the local outputs untouched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use drive_client::{DriveError, FileId, Token};
use label_image::{CaptionFont, QrStyle, generate_qr, save_png, with_caption};
use tracing::{info, warn};

pub const LINK_QR_FILENAME: &str = "export_link_qr.png";
pub const LINK_TEXT_FILENAME: &str = "export_link.txt";
const EXPORT_MIME: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("No stored credential; run `credential set` first")]
    NoCredential,

    #[error("Drive error: {0}")]
    Drive(#[from] DriveError),

    #[error("Credential store error: {0}")]
    Store(#[from] credential_db::DbError),

    #[error("Link image error: {0}")]
    Image(#[from] label_image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Publishing timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of the OAuth credential used for uploads.
#[allow(async_fn_in_trait)]
pub trait CredentialProvider {
    async fn load(&self) -> Result<Option<Token>, PublishError>;

    async fn refresh(&self, current: &Token) -> Result<Token, PublishError>;

    async fn store(&self, token: &Token) -> Result<(), PublishError>;

    fn is_valid(&self, token: &Token) -> bool;
}

/// Load the stored credential, refreshing and persisting it when stale.
pub async fn authenticate<C: CredentialProvider>(provider: &C) -> Result<Token, PublishError> {
    let token = provider.load().await?.ok_or(PublishError::NoCredential)?;
    if provider.is_valid(&token) {
        return Ok(token);
    }
    if token.refresh_token.is_empty() {
        return Err(PublishError::NoCredential);
    }
    let fresh = provider.refresh(&token).await?;
    provider.store(&fresh).await?;
    info!("Stored refreshed credential");
    Ok(fresh)
}

/// Remote file storage.
#[allow(async_fn_in_trait)]
pub trait StorageClient {
    async fn upload_file(
        &self,
        token: &Token,
        bytes: Vec<u8>,
        name: &str,
        mime_type: &str,
    ) -> Result<FileId, PublishError>;

    async fn set_public_read(&self, token: &Token, file_id: &FileId) -> Result<(), PublishError>;

    fn download_url(&self, file_id: &FileId) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedLink {
    pub file_id: FileId,
    pub url: String,
}

pub struct Publisher<C, S> {
    credentials: C,
    storage: S,
    timeout: Duration,
}

impl<C: CredentialProvider, S: StorageClient> Publisher<C, S> {
    pub fn new(credentials: C, storage: S, timeout: Duration) -> Self {
        Self {
            credentials,
            storage,
            timeout,
        }
    }

    /// Upload `path` as `display_name` and share it publicly.
    pub async fn publish(&self, path: &Path, display_name: &str) -> Result<PublishedLink, PublishError> {
        tokio::time::timeout(self.timeout, self.publish_inner(path, display_name))
            .await
            .map_err(|_| PublishError::Timeout(self.timeout))?
    }

    async fn publish_inner(&self, path: &Path, display_name: &str) -> Result<PublishedLink, PublishError> {
        let token = authenticate(&self.credentials).await?;
        let bytes = tokio::fs::read(path).await?;

        let file_id = self
            .storage
            .upload_file(&token, bytes, display_name, EXPORT_MIME)
            .await?;
        info!(file_id = %file_id, "Export uploaded");

        self.storage.set_public_read(&token, &file_id).await?;
        let url = self.storage.download_url(&file_id);
        Ok(PublishedLink { file_id, url })
    }
}

/// Files written for a published link.
#[derive(Debug, Clone)]
pub struct LinkArtifacts {
    pub qr_path: PathBuf,
    pub text_path: PathBuf,
}

/// Write the download-link QR image and a text file holding the URL and
/// file id into `output_dir`.
pub fn write_link_artifacts(
    output_dir: &Path,
    link: &PublishedLink,
    caption: &str,
    font: &CaptionFont,
) -> Result<LinkArtifacts, PublishError> {
    let symbol = generate_qr(&link.url, &QrStyle::EXPORT_LINK)?;
    let labelled = with_caption(&symbol, caption, font);
    let qr_path = output_dir.join(LINK_QR_FILENAME);
    save_png(&labelled, &qr_path)?;

    let text_path = output_dir.join(LINK_TEXT_FILENAME);
    std::fs::write(&text_path, format!("{}\n{}\n", link.url, link.file_id))?;

    info!(path = %qr_path.display(), "Export link QR written");
    Ok(LinkArtifacts { qr_path, text_path })
}

/// Publish and write link artifacts. Failures are logged and reported as
/// `None`; the caller's outputs are already complete.
pub async fn publish_export<C, S>(
    publisher: &Publisher<C, S>,
    export_path: &Path,
    output_dir: &Path,
    caption: &str,
    font: &CaptionFont,
) -> Option<(PublishedLink, Option<LinkArtifacts>)>
where
    C: CredentialProvider,
    S: StorageClient,
{
    let display_name = export_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "inventory_import.json".to_string());

    let link = match publisher.publish(export_path, &display_name).await {
        Ok(link) => link,
        Err(e) => {
            warn!("Publishing skipped: {e}");
            return None;
        }
    };

    let artifacts = match write_link_artifacts(output_dir, &link, caption, font) {
        Ok(a) => Some(a),
        Err(e) => {
            warn!(url = %link.url, "Could not write link QR: {e}");
            None
        }
    };
    Some((link, artifacts))
}
