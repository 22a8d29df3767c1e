//! HTTP fetcher for raw repository files.

use std::time::Duration;

use ureq::Agent;

use crate::ContentFetcher;
use crate::error::FetchError;

/// Default raw content host.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Fetches files from a raw content host as `<base>/<repo>/<branch>/<path>`.
#[derive(Clone)]
pub struct RawContentFetcher {
    agent: Agent,
    base_url: String,
}

impl RawContentFetcher {
    /// Create a fetcher for `base_url` with a global request timeout.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Full URL for a file.
    fn file_url(&self, repo: &str, branch: &str, path: &str) -> String {
        format!("{}/{repo}/{branch}/{path}", self.base_url)
    }
}

impl Default for RawContentFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT))
    }
}

impl std::fmt::Debug for RawContentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawContentFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ContentFetcher for RawContentFetcher {
    fn fetch(&self, repo: &str, branch: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.file_url(repo, branch, path);
        tracing::debug!(%url, "Fetching raw file");

        let response = self.agent.get(&url).call()?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(FetchError::NotFound {
                path: path.to_owned(),
            });
        }
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Content host returned error status");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let content = response
            .into_body()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    fn fetcher(server: &MockServer) -> RawContentFetcher {
        RawContentFetcher::new(&server.base_url(), Duration::from_secs(5))
    }

    #[test]
    fn test_fetch_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/octo/handbook/main/docs/README.md");
            then.status(200).body("# Handbook\n");
        });

        let content = fetcher(&server)
            .fetch("octo/handbook", "main", "docs/README.md")
            .unwrap();

        mock.assert();
        assert_eq!(content, b"# Handbook\n");
    }

    #[test]
    fn test_fetch_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/octo/handbook/main/missing.md");
            then.status(404).body("404: Not Found");
        });

        let err = fetcher(&server)
            .fetch("octo/handbook", "main", "missing.md")
            .unwrap_err();

        assert!(matches!(err, FetchError::NotFound { ref path } if path == "missing.md"));
    }

    #[test]
    fn test_fetch_upstream_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/octo/handbook/main/guide.md");
            then.status(503);
        });

        let err = fetcher(&server)
            .fetch("octo/handbook", "main", "guide.md")
            .unwrap_err();

        assert!(matches!(err, FetchError::Upstream { status: 503 }));
    }

    #[test]
    fn test_fetch_transport_error() {
        // Nothing listens on port 9 of localhost.
        let fetcher = RawContentFetcher::new("http://127.0.0.1:9", Duration::from_secs(2));

        let err = fetcher.fetch("octo/handbook", "main", "README.md").unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base() {
        let fetcher = RawContentFetcher::new("https://raw.example.com//", Duration::from_secs(1));

        assert_eq!(
            fetcher.file_url("octo/handbook", "v2", "a/b.md"),
            "https://raw.example.com/octo/handbook/v2/a/b.md"
        );
    }
}
