//! Registry trait, lookup result and error types.

use async_trait::async_trait;

use crate::site::{NewSite, Site};

/// Outcome of a single-site lookup.
///
/// Keeps "no such site" apart from "the registry could not answer", so
/// callers never mistake a backend failure for a missing record.
#[derive(Debug)]
pub enum SiteLookup {
    /// A record exists.
    Found(Site),
    /// No record matches.
    NotFound,
    /// The registry failed to answer.
    Failure(RegistryError),
}

impl SiteLookup {
    /// Collapse into `Result<Option<Site>>` for `?`-style callers.
    pub fn into_result(self) -> Result<Option<Site>, RegistryError> {
        match self {
            Self::Found(site) => Ok(Some(site)),
            Self::NotFound => Ok(None),
            Self::Failure(err) => Err(err),
        }
    }
}

impl From<Result<Option<Site>, RegistryError>> for SiteLookup {
    fn from(result: Result<Option<Site>, RegistryError>) -> Self {
        match result {
            Ok(Some(site)) => Self::Found(site),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Failure(err),
        }
    }
}

/// Error returned by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A site with this slug already exists; nothing was written.
    #[error("slug already taken: {0}")]
    SlugTaken(String),

    /// SQL backend failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend unavailable for a non-SQL reason.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Store of [`Site`] records keyed by id, owner and unique slug.
#[async_trait]
pub trait SiteRegistry: Send + Sync {
    /// Look up a site by its subdomain slug.
    async fn find_by_slug(&self, slug: &str) -> SiteLookup;

    /// Look up a site by id.
    async fn find_by_id(&self, id: i64) -> SiteLookup;

    /// All sites created by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Site>, RegistryError>;

    /// Persist a new site, assigning `id` and `created_at`.
    ///
    /// Fails with [`RegistryError::SlugTaken`] before anything is written
    /// when the slug already exists.
    async fn create(&self, site: NewSite) -> Result<Site, RegistryError>;

    /// Remove a site permanently. Deleting an unknown id succeeds.
    async fn delete(&self, id: i64) -> Result<(), RegistryError>;
}
