//! Raw file fetching for pubsite.
//!
//! A [`ContentFetcher`] retrieves one file from a repository branch in a
//! single blocking request. [`RawContentFetcher`] talks to a raw content
//! host over HTTP; [`MockFetcher`] (behind the `mock` feature) serves files
//! from memory.

mod error;
mod raw;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use error::FetchError;
pub use raw::{DEFAULT_BASE_URL, RawContentFetcher};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockFetcher;

/// Blocking retrieval of raw repository files.
///
/// Implementations make one attempt per call and never cache.
pub trait ContentFetcher: Send + Sync {
    /// Fetch `path` from `repo` at `branch`.
    ///
    /// # Errors
    ///
    /// [`FetchError::NotFound`] when the host has no such file,
    /// [`FetchError::Upstream`] for other non-success statuses and
    /// [`FetchError::Transport`] when no response was received.
    fn fetch(&self, repo: &str, branch: &str, path: &str) -> Result<Vec<u8>, FetchError>;
}
