//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use axum::http::HeaderName;
use pubsite_fetch::ContentFetcher;
use pubsite_registry::SiteRegistry;
use pubsite_renderer::MarkdownRenderer;
use pubsite_resolver::SiteResolver;

/// Application state shared across all handlers.
pub struct AppState {
    /// Site registry for the management API.
    pub(crate) registry: Arc<dyn SiteRegistry>,
    /// Public-site resolution pipeline.
    pub(crate) resolver: SiteResolver,
    /// Header carrying the authenticated owner id.
    pub(crate) owner_header: HeaderName,
}

impl AppState {
    /// Build state over a registry, fetcher and renderer.
    #[must_use]
    pub fn new(
        registry: Arc<dyn SiteRegistry>,
        fetcher: Arc<dyn ContentFetcher>,
        renderer: MarkdownRenderer,
        owner_header: HeaderName,
    ) -> Self {
        let resolver = SiteResolver::new(Arc::clone(&registry), fetcher, renderer);
        Self {
            registry,
            resolver,
            owner_header,
        }
    }
}
