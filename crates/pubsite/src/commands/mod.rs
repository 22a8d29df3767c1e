//! CLI command implementations.

pub(crate) mod preview;
pub(crate) mod serve;
pub(crate) mod sites;

use std::path::PathBuf;

use clap::Args;
use pubsite_config::{CliSettings, Config};

pub(crate) use preview::PreviewArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use sites::SitesCommand;

use crate::error::CliError;

/// Configuration options shared by every command.
#[derive(Args, Debug, Default)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover pubsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site registry database URL (overrides config).
    #[arg(long, env = "PUBSITE_DATABASE_URL")]
    database_url: Option<String>,

    /// Raw content host base URL (overrides config).
    #[arg(long, env = "PUBSITE_CONTENT_URL")]
    content_url: Option<String>,
}

impl ConfigArgs {
    /// Load configuration with these overrides plus server bind settings.
    pub(crate) fn load(
        &self,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            host,
            port,
            database_url: self.database_url.clone(),
            content_url: self.content_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}
