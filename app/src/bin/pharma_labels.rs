//! Command-line entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pharma_labels_lib::cli::Cli;
use pharma_labels_lib::config::{AppConfig, load_dotenv};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    tracing::debug!(?config, "Configuration loaded");

    pharma_labels_lib::run_cli(cli, config).await
}
