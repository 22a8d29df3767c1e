//! HTTP server for pubsite.
//!
//! Serves two surfaces from one axum router:
//! - public sites: any `GET` on `<slug>.<domain>.<tld>` renders a markdown
//!   file from the site's repository inside the public page layout
//! - the site management API under `/api/sites`
//!
//! # Quick Start
//!
//! ```ignore
//! use pubsite_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (pubsite-server)
//!                        │
//!                        ├─► /api/sites ──► SiteRegistry (sqlx)
//!                        │
//!                        └─► fallback ──► SiteResolver
//!                                            ├─► SiteRegistry
//!                                            ├─► ContentFetcher (ureq, blocking pool)
//!                                            └─► MarkdownRenderer
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
pub mod presenter;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;
use pubsite_fetch::RawContentFetcher;
use pubsite_registry::SqliteRegistry;
use pubsite_renderer::MarkdownRenderer;

pub use app::create_router;
pub use error::ServerError;
pub use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site registry database URL.
    pub database_url: String,
    /// Maximum registry pool connections.
    pub max_connections: u32,
    /// Raw content host base URL.
    pub content_url: String,
    /// Timeout for one content fetch.
    pub content_timeout: Duration,
    /// Header carrying the authenticated owner id.
    pub owner_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            database_url: "sqlite://pubsite.db".to_owned(),
            max_connections: 5,
            content_url: pubsite_fetch::DEFAULT_BASE_URL.to_owned(),
            content_timeout: Duration::from_secs(30),
            owner_header: "x-owner-id".to_owned(),
        }
    }
}

/// Build shared state from configuration: registry, fetcher and renderer.
///
/// # Errors
///
/// Returns an error if the registry cannot be opened or the owner header
/// name is invalid.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let registry = SqliteRegistry::connect(&config.database_url, config.max_connections).await?;
    let fetcher = RawContentFetcher::new(&config.content_url, config.content_timeout);
    let owner_header = HeaderName::from_str(&config.owner_header)?;

    Ok(AppState::new(
        Arc::new(registry),
        Arc::new(fetcher),
        MarkdownRenderer::new(),
        owner_header,
    ))
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(build_state(&config).await?);
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, content = %config.content_url, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from pubsite config.
#[must_use]
pub fn server_config_from_config(config: &pubsite_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        content_url: config.content.base_url.clone(),
        content_timeout: config.content.timeout(),
        owner_header: config.auth.owner_header.clone(),
    }
}
