//! Drive-backed implementations of the publishing seams.

use credential_db::Database;
use drive_client::{DriveAuth, DriveFiles, FileId, Token};

use super::publish::{CredentialProvider, PublishError, StorageClient};

/// Rows kept in the token table after each refresh.
const TOKEN_HISTORY: usize = 5;

fn to_drive(token: credential_db::Token) -> Token {
    Token {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        scope: token.scope,
        expires_at: token.expires_at,
    }
}

fn to_stored(token: &Token) -> credential_db::Token {
    credential_db::Token {
        access_token: token.access_token.clone(),
        refresh_token: token.refresh_token.clone(),
        scope: token.scope.clone(),
        expires_at: token.expires_at,
    }
}

/// OAuth credential persisted in the local SQLite store.
pub struct DbCredentialProvider {
    db: Database,
    auth: DriveAuth,
}

impl DbCredentialProvider {
    pub fn new(db: Database, auth: DriveAuth) -> Self {
        Self { db, auth }
    }
}

impl CredentialProvider for DbCredentialProvider {
    async fn load(&self) -> Result<Option<Token>, PublishError> {
        Ok(self.db.get_latest_token()?.map(to_drive))
    }

    async fn refresh(&self, current: &Token) -> Result<Token, PublishError> {
        Ok(self.auth.refresh_token(&current.refresh_token).await?)
    }

    async fn store(&self, token: &Token) -> Result<(), PublishError> {
        self.db.save_token(&to_stored(token))?;
        self.db.prune_tokens(TOKEN_HISTORY)?;
        Ok(())
    }

    fn is_valid(&self, token: &Token) -> bool {
        DriveAuth::is_valid(token)
    }
}

/// Seed the store with a refresh token obtained out of band. The access
/// token is left empty so the first publish refreshes it.
pub fn store_refresh_token(db: &Database, refresh_token: &str) -> Result<(), PublishError> {
    db.save_token(&credential_db::Token {
        access_token: String::new(),
        refresh_token: refresh_token.trim().to_string(),
        scope: drive_client::SCOPES.join(" "),
        expires_at: 0,
    })?;
    Ok(())
}

pub struct DriveStorage {
    files: DriveFiles,
}

impl DriveStorage {
    pub fn new(files: DriveFiles) -> Self {
        Self { files }
    }
}

impl StorageClient for DriveStorage {
    async fn upload_file(
        &self,
        token: &Token,
        bytes: Vec<u8>,
        name: &str,
        mime_type: &str,
    ) -> Result<FileId, PublishError> {
        Ok(self.files.upload_file(token, bytes, name, mime_type).await?)
    }

    async fn set_public_read(&self, token: &Token, file_id: &FileId) -> Result<(), PublishError> {
        Ok(self.files.set_public_read(token, file_id).await?)
    }

    fn download_url(&self, file_id: &FileId) -> String {
        DriveFiles::download_url(file_id)
    }
}
