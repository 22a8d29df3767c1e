//! Resolution error types.

use pubsite_fetch::FetchError;
use pubsite_registry::RegistryError;
use pubsite_renderer::RenderError;

/// Why a public-site request could not be turned into a page.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Host does not have the `<slug>.<domain>.<tld>` shape.
    #[error("Invalid subdomain")]
    MalformedHost(String),

    /// No site is registered under the slug.
    #[error("Site not found")]
    SiteNotFound(String),

    /// Registry could not answer the lookup.
    #[error("site registry failed")]
    Registry(#[source] RegistryError),

    /// Neither the requested file nor its fallback could be fetched.
    #[error("File not found: {source}")]
    FileNotFound {
        /// Path of the last fetch attempted.
        path: String,
        #[source]
        source: FetchError,
    },

    /// Fetched content could not be rendered.
    #[error("failed to render markdown")]
    RenderFailed(#[source] RenderError),
}

impl ResolveError {
    /// Whether the failure is the caller's (bad host, unknown site or file)
    /// rather than the server's.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedHost(_) | Self::SiteNotFound(_) | Self::FileNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_message_includes_cause() {
        let err = ResolveError::FileNotFound {
            path: "index.md".to_owned(),
            source: FetchError::NotFound {
                path: "index.md".to_owned(),
            },
        };

        assert_eq!(err.to_string(), "File not found: file not found: index.md");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_server_errors() {
        let err = ResolveError::Registry(RegistryError::Unavailable("down".to_owned()));
        assert!(!err.is_client_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
