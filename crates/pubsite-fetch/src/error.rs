//! Fetch error types.

/// Error from a single raw-file fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Content host answered with its not-found status.
    #[error("file not found: {path}")]
    NotFound {
        /// Path inside the repository.
        path: String,
    },

    /// Content host answered with another non-success status.
    #[error("unexpected status code: {status}")]
    Upstream {
        /// HTTP status code.
        status: u16,
    },

    /// Request could not be completed (connection, TLS, timeout, body read).
    #[error("failed to fetch file")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    /// Whether the host reported the file as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Wrap any error as a transport failure.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = FetchError::NotFound {
            path: "docs/README.md".to_owned(),
        };
        assert_eq!(err.to_string(), "file not found: docs/README.md");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_upstream_is_not_not_found() {
        let err = FetchError::Upstream { status: 502 };
        assert_eq!(err.to_string(), "unexpected status code: 502");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transport_keeps_source() {
        let err = FetchError::transport("connection reset");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection reset");
    }
}
