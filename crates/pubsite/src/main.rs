//! pubsite CLI - markdown micro-sites published from GitHub.
//!
//! Provides commands for:
//! - `serve`: Start the site server
//! - `sites list|create|delete`: Manage the site registry
//! - `preview`: Render one page to stdout without starting a server

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PreviewArgs, ServeArgs, SitesCommand};
use error::CliError;
use output::Output;

/// pubsite - markdown micro-sites published from GitHub.
#[derive(Parser)]
#[command(name = "pubsite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server.
    Serve(ServeArgs),
    /// Site registry commands.
    #[command(subcommand)]
    Sites(SitesCommand),
    /// Render a page as the server would and write it to stdout.
    Preview(PreviewArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = tokio::runtime::Runtime::new()
        .map_err(CliError::from)
        .and_then(|rt| {
            rt.block_on(async {
                match cli.command {
                    Commands::Serve(args) => args.execute().await,
                    Commands::Sites(cmd) => cmd.execute().await,
                    Commands::Preview(args) => args.execute().await,
                }
            })
        });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["pubsite", "serve", "--port", "8080", "--verbose"]).unwrap();

        assert!(matches!(cli.command, Commands::Serve(args) if args.verbose));
    }

    #[test]
    fn test_parse_sites_create_defaults() {
        let cli = Cli::try_parse_from([
            "pubsite", "sites", "create", "--owner", "3", "--slug", "docs", "--repo", "octo/docs",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Sites(SitesCommand::Create(_))));
    }

    #[test]
    fn test_parse_preview_requires_host() {
        assert!(Cli::try_parse_from(["pubsite", "preview"]).is_err());
        assert!(Cli::try_parse_from(["pubsite", "preview", "docs.example.com"]).is_ok());
    }

    #[test]
    fn test_parse_sites_delete_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["pubsite", "sites", "delete", "abc"]).is_err());
    }
}
