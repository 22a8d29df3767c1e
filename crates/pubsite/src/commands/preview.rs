//! `pubsite preview` command implementation.

use std::sync::Arc;

use clap::Args;
use pubsite_fetch::RawContentFetcher;
use pubsite_registry::SqliteRegistry;
use pubsite_renderer::MarkdownRenderer;
use pubsite_resolver::SiteResolver;
use pubsite_server::presenter;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Request host, e.g. `docs.example.com`.
    host: String,

    /// Request path.
    #[arg(default_value = "/")]
    path: String,
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page does not resolve.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(None, None)?;

        let registry =
            SqliteRegistry::connect(&config.database.url, config.database.max_connections)
                .await?;
        let fetcher = RawContentFetcher::new(&config.content.base_url, config.content.timeout());
        let resolver = SiteResolver::new(
            Arc::new(registry),
            Arc::new(fetcher),
            MarkdownRenderer::new(),
        );

        let page = resolver.resolve(&self.host, &self.path).await?;
        output.detail(&format!(
            "Rendered {}@{}:{}",
            page.site.github_repo, page.site.github_branch, page.source_path
        ));
        output.data(&presenter::public_site(&page.site, &page.html))?;
        Ok(())
    }
}
