pub mod cli;
pub mod config;
pub mod layout;
pub mod pipeline;
pub mod services;

use std::path::{Path, PathBuf};

use anyhow::Context;
use credential_db::Database;
use drive_client::{DriveAuth, DriveFiles};
use inventory::Catalog;
use label_image::CaptionFont;

use cli::{Cli, Command, CredentialAction};
use config::AppConfig;
use services::credentials::{DbCredentialProvider, DriveStorage, store_refresh_token};
use services::publish::{Publisher, publish_export};

const CREDENTIAL_DB_FILE: &str = "credentials.db";

/// Dispatch a parsed command line.
pub async fn run_cli(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    cli.generate.apply(&mut config);

    match cli.command {
        None | Some(Command::Generate) => generate(&config).await,
        Some(Command::WriteSampleCatalog { path }) => {
            let path = path.unwrap_or_else(|| config.catalog_path.clone());
            Catalog::sample().save(&path)?;
            tracing::info!(path = %path.display(), "Sample catalog written");
            Ok(())
        }
        Some(Command::Credential { action }) => credential(action),
    }
}

/// Use the configured catalog file, or the built-in sample when it does not exist.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    if path.exists() {
        return Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()));
    }
    tracing::warn!(
        path = %path.display(),
        "Catalog file not found, using the built-in sample catalog"
    );
    Ok(Catalog::sample())
}

async fn generate(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path)?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let summary = pipeline::run_generation(config, &catalog)?;
    tracing::info!(
        products = catalog.products.len(),
        labels = summary.labels_placed,
        skipped = summary.labels_skipped,
        pages = summary.pages,
        export_items = summary.export_items,
        "Generation complete"
    );
    for group in &summary.page_groups {
        tracing::info!(
            prefix = %group.code_prefix,
            labels = group.labels,
            "Pages {}-{}",
            group.first_page + 1,
            group.last_page + 1
        );
    }
    tracing::info!("Labels: {}", summary.pdf_path.display());
    tracing::info!("Export: {}", summary.export_path.display());
    tracing::info!("QR images: {}", summary.qr_dir.display());

    if !config.publish.enabled {
        return Ok(());
    }

    let missing = config.missing_settings();
    if !missing.is_empty() {
        tracing::warn!("Publishing skipped, missing settings: {}", missing.join(", "));
        return Ok(());
    }

    let publisher = build_publisher(config)?;
    let font = CaptionFont::load(config.font_path.as_deref());
    match publish_export(
        &publisher,
        &summary.export_path,
        &config.output_dir,
        &config.publish.link_caption,
        &font,
    )
    .await
    {
        Some((link, artifacts)) => {
            tracing::info!(url = %link.url, "Export published; scan the link QR in the POS app to import");
            if let Some(artifacts) = artifacts {
                tracing::info!("Link QR: {}", artifacts.qr_path.display());
                tracing::info!("Link text: {}", artifacts.text_path.display());
            }
        }
        None => tracing::info!("Local outputs are complete; import the export file manually"),
    }
    Ok(())
}

fn build_publisher(config: &AppConfig) -> anyhow::Result<Publisher<DbCredentialProvider, DriveStorage>> {
    let db = open_credential_db()?;
    let http = drive_client::http_client(drive_client::DEFAULT_TIMEOUT)?;
    let auth = DriveAuth::new(
        config.publish.client_id.clone(),
        config.publish.client_secret.clone(),
        http.clone(),
    );
    let files = DriveFiles::new(http, config.publish.folder_id.clone());
    Ok(Publisher::new(
        DbCredentialProvider::new(db, auth),
        DriveStorage::new(files),
        config.publish.timeout,
    ))
}

fn credential_db_path() -> PathBuf {
    config::data_dir().join(CREDENTIAL_DB_FILE)
}

fn open_credential_db() -> anyhow::Result<Database> {
    let path = credential_db_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    tracing::debug!("Opening credential store at {}", path.display());
    Ok(Database::open(&path)?)
}

fn credential(action: CredentialAction) -> anyhow::Result<()> {
    let db = open_credential_db()?;
    match action {
        CredentialAction::Set { refresh_token } => {
            if refresh_token.trim().is_empty() {
                anyhow::bail!("refresh token must not be empty");
            }
            store_refresh_token(&db, &refresh_token)?;
            tracing::info!("Refresh token stored; it will be exchanged on the next publish");
        }
        CredentialAction::Clear => {
            let removed = db.delete_all_tokens()?;
            tracing::info!(removed, "Stored credentials cleared");
        }
        CredentialAction::Show => match db.get_latest_token()? {
            None => tracing::info!("No credential stored"),
            Some(token) => {
                let expires = chrono::DateTime::from_timestamp(token.expires_at, 0)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown".into());
                tracing::info!(
                    has_access_token = !token.access_token.is_empty(),
                    has_refresh_token = !token.refresh_token.is_empty(),
                    scope = %token.scope,
                    expires = %expires,
                    "Credential stored at {}",
                    credential_db_path().display()
                );
            }
        },
    }
    Ok(())
}
