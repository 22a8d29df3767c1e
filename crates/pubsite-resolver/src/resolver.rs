//! Site resolution pipeline.

use std::sync::Arc;

use pubsite_fetch::{ContentFetcher, FetchError};
use pubsite_registry::{Site, SiteLookup, SiteRegistry};
use pubsite_renderer::MarkdownRenderer;

use crate::error::ResolveError;
use crate::host::parse_host;
use crate::path::{index_fallback, normalize_path};

/// A rendered page ready for presentation.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Site the page belongs to.
    pub site: Site,
    /// Rendered HTML fragment.
    pub html: String,
    /// Repository path actually served, after any fallback.
    pub source_path: String,
}

/// Resolves `(host, path)` requests to rendered pages.
///
/// Holds no per-request state: every call re-reads the registry and
/// re-fetches content.
#[derive(Clone)]
pub struct SiteResolver {
    registry: Arc<dyn SiteRegistry>,
    fetcher: Arc<dyn ContentFetcher>,
    renderer: MarkdownRenderer,
}

impl SiteResolver {
    #[must_use]
    pub fn new(
        registry: Arc<dyn SiteRegistry>,
        fetcher: Arc<dyn ContentFetcher>,
        renderer: MarkdownRenderer,
    ) -> Self {
        Self {
            registry,
            fetcher,
            renderer,
        }
    }

    /// Registry used for lookups.
    #[must_use]
    pub fn registry(&self) -> &Arc<dyn SiteRegistry> {
        &self.registry
    }

    /// Resolve a request to a rendered page.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MalformedHost`]: host has fewer than three labels
    /// - [`ResolveError::SiteNotFound`]: no site for the slug
    /// - [`ResolveError::Registry`]: registry lookup failed
    /// - [`ResolveError::FileNotFound`]: file (and, for `README.md`, its
    ///   `index.md` fallback) could not be fetched
    /// - [`ResolveError::RenderFailed`]: content is not renderable
    pub async fn resolve(
        &self,
        host: &str,
        request_path: &str,
    ) -> Result<RenderedPage, ResolveError> {
        let slug = parse_host(host)?;

        let site = match self.registry.find_by_slug(slug).await {
            SiteLookup::Found(site) => site,
            SiteLookup::NotFound => return Err(ResolveError::SiteNotFound(slug.to_owned())),
            SiteLookup::Failure(e) => return Err(ResolveError::Registry(e)),
        };

        let path = normalize_path(request_path, &site.subdirectory);
        tracing::debug!(slug, %path, repo = %site.github_repo, "Resolving page");

        let (content, source_path) = match self.fetch(&site, &path).await {
            Ok(content) => (content, path),
            Err(err) => {
                let Some(fallback) = index_fallback(&path) else {
                    tracing::warn!(%path, error = %err, "Fetch failed");
                    return Err(ResolveError::FileNotFound { path, source: err });
                };
                tracing::warn!(%path, %fallback, error = %err, "README fetch failed, trying index");
                match self.fetch(&site, &fallback).await {
                    Ok(content) => (content, fallback),
                    Err(err) => {
                        tracing::warn!(path = %fallback, error = %err, "Fetch failed");
                        return Err(ResolveError::FileNotFound {
                            path: fallback,
                            source: err,
                        });
                    }
                }
            }
        };

        let html = self
            .renderer
            .render(&content)
            .map_err(ResolveError::RenderFailed)?;

        Ok(RenderedPage {
            site,
            html,
            source_path,
        })
    }

    /// Run the blocking fetch off the async worker threads.
    async fn fetch(&self, site: &Site, path: &str) -> Result<Vec<u8>, FetchError> {
        let fetcher = Arc::clone(&self.fetcher);
        let repo = site.github_repo.clone();
        let branch = site.github_branch.clone();
        let path = path.to_owned();

        tokio::task::spawn_blocking(move || fetcher.fetch(&repo, &branch, &path))
            .await
            .unwrap_or_else(|e| Err(FetchError::transport(e)))
    }
}

impl std::fmt::Debug for SiteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteResolver")
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}
