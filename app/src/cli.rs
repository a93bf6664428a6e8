//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate per-unit QR labels and an inventory export for a pharmacy catalog")]
pub struct Cli {
    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Catalog JSON file (overrides CATALOG_PATH)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output directory (overrides OUTPUT_DIR)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Upload the export and write a download-link QR
    #[arg(long, global = true)]
    pub publish: bool,

    /// Keep QR images from earlier runs
    #[arg(long, global = true)]
    pub no_clean: bool,
}

impl GenerateArgs {
    /// Apply command-line overrides on top of environment configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog_path = catalog.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if self.publish {
            config.publish.enabled = true;
        }
        if self.no_clean {
            config.clean_output = false;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate labels, QR images and the inventory export (default)
    Generate,

    /// Write the built-in sample catalog as JSON
    WriteSampleCatalog {
        /// Destination file (defaults to CATALOG_PATH)
        path: Option<PathBuf>,
    },

    /// Manage the stored cloud credential
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CredentialAction {
    /// Store a refresh token obtained from the OAuth consent flow
    Set {
        #[arg(long, env = "DRIVE_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,
    },
    /// Delete all stored tokens
    Clear,
    /// Show whether a usable credential is stored
    Show,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::CommandFactory;

    use super::*;

    fn config() -> AppConfig {
        let empty: HashMap<String, String> = HashMap::new();
        AppConfig::from_lookup(|k| empty.get(k).cloned()).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_generate() {
        let cli = Cli::try_parse_from(["pharma-labels", "--catalog", "cat.json", "--no-clean"]).unwrap();
        assert!(cli.command.is_none());

        let mut config = config();
        cli.generate.apply(&mut config);
        assert_eq!(config.catalog_path, PathBuf::from("cat.json"));
        assert!(!config.clean_output);
        assert!(!config.publish.enabled);
    }

    #[test]
    fn flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["pharma-labels", "generate", "--publish", "-o", "/tmp/out"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Generate)));

        let mut config = config();
        cli.generate.apply(&mut config);
        assert!(config.publish.enabled);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn credential_set_takes_refresh_token() {
        let cli = Cli::try_parse_from(["pharma-labels", "credential", "set", "--refresh-token", "1//abc"]).unwrap();
        match cli.command {
            Some(Command::Credential {
                action: CredentialAction::Set { refresh_token },
            }) => assert_eq!(refresh_token, "1//abc"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
