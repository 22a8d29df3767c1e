//! CLI error types.

use pubsite_config::ConfigError;
use pubsite_registry::{RegistryError, ValidationErrors};
use pubsite_resolver::ResolveError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid site: {0}")]
    Validation(ValidationErrors),

    #[error("site {0} not found")]
    SiteNotFound(i64),

    #[error("{0}")]
    Server(String),
}
