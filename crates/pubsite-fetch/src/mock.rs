//! Mock fetcher for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::ContentFetcher;
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Response {
    Content(Vec<u8>),
    Status(u16),
    Transport(String),
}

/// In-memory fetcher keyed by `(repo, branch, path)`.
///
/// Unknown files answer [`FetchError::NotFound`]. Every call is recorded
/// so tests can assert which paths were requested.
///
/// # Example
///
/// ```ignore
/// use pubsite_fetch::{ContentFetcher, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_file("octo/handbook", "main", "README.md", "# Hi");
///
/// assert!(fetcher.fetch("octo/handbook", "main", "README.md").is_ok());
/// assert_eq!(fetcher.requests(), vec!["README.md"]);
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: RwLock<HashMap<(String, String, String), Response>>,
    requests: RwLock<Vec<String>>,
}

impl MockFetcher {
    /// Create a fetcher with no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for a file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(
        self,
        repo: &str,
        branch: &str,
        path: &str,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(repo, branch, path, Response::Content(content.into()));
        self
    }

    /// Answer a file with an HTTP status (404 maps to `NotFound`).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_status(self, repo: &str, branch: &str, path: &str, status: u16) -> Self {
        self.insert(repo, branch, path, Response::Status(status));
        self
    }

    /// Fail a file with a transport error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_transport_error(
        self,
        repo: &str,
        branch: &str,
        path: &str,
        message: &str,
    ) -> Self {
        self.insert(repo, branch, path, Response::Transport(message.to_owned()));
        self
    }

    /// Paths requested so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }

    fn insert(&self, repo: &str, branch: &str, path: &str, response: Response) {
        self.responses.write().unwrap().insert(
            (repo.to_owned(), branch.to_owned(), path.to_owned()),
            response,
        );
    }
}

impl ContentFetcher for MockFetcher {
    fn fetch(&self, repo: &str, branch: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.write().unwrap().push(path.to_owned());

        let key = (repo.to_owned(), branch.to_owned(), path.to_owned());
        match self.responses.read().unwrap().get(&key).cloned() {
            Some(Response::Content(content)) => Ok(content),
            Some(Response::Status(404)) | None => Err(FetchError::NotFound {
                path: path.to_owned(),
            }),
            Some(Response::Status(status)) => Err(FetchError::Upstream { status }),
            Some(Response::Transport(message)) => Err(FetchError::transport(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_file_served() {
        let fetcher = MockFetcher::new().with_file("octo/a", "main", "README.md", "# A");

        assert_eq!(fetcher.fetch("octo/a", "main", "README.md").unwrap(), b"# A");
    }

    #[test]
    fn test_branch_is_part_of_key() {
        let fetcher = MockFetcher::new().with_file("octo/a", "main", "README.md", "# A");

        assert!(fetcher.fetch("octo/a", "dev", "README.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_forced_failures() {
        let fetcher = MockFetcher::new()
            .with_status("octo/a", "main", "down.md", 500)
            .with_transport_error("octo/a", "main", "slow.md", "timed out");

        assert!(matches!(
            fetcher.fetch("octo/a", "main", "down.md"),
            Err(FetchError::Upstream { status: 500 })
        ));
        assert!(matches!(
            fetcher.fetch("octo/a", "main", "slow.md"),
            Err(FetchError::Transport(_))
        ));
    }

    #[test]
    fn test_requests_recorded_in_order() {
        let fetcher = MockFetcher::new();
        let _ = fetcher.fetch("octo/a", "main", "README.md");
        let _ = fetcher.fetch("octo/a", "main", "index.md");

        assert_eq!(fetcher.requests(), vec!["README.md", "index.md"]);
    }
}
