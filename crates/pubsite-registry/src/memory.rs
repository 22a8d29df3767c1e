//! In-memory registry for testing.
//!
//! Provides [`MemoryRegistry`] for unit tests that need sites without a
//! database.

use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::registry::{RegistryError, SiteLookup, SiteRegistry};
use crate::site::{NewSite, Site};

/// In-memory site registry.
///
/// Use the builder methods to seed sites, or [`MemoryRegistry::failing`]
/// to simulate an unavailable backend.
///
/// # Example
///
/// ```ignore
/// use pubsite_registry::{MemoryRegistry, SiteRegistry};
///
/// let registry = MemoryRegistry::new()
///     .with_site("docs", "octo/handbook", "main", "");
///
/// let site = registry.find_by_slug("docs").await;
/// ```
#[derive(Debug)]
pub struct MemoryRegistry {
    sites: RwLock<Vec<Site>>,
    next_id: AtomicI64,
    failure: Option<String>,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self {
            sites: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failure: None,
        }
    }
}

impl MemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose every operation fails with [`RegistryError::Unavailable`].
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Seed a site owned by user 1.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_site(self, slug: &str, repo: &str, branch: &str, subdirectory: &str) -> Self {
        self.with_owned_site(1, slug, repo, branch, subdirectory)
    }

    /// Seed a site for a specific owner.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_owned_site(
        self,
        owner_id: i64,
        slug: &str,
        repo: &str,
        branch: &str,
        subdirectory: &str,
    ) -> Self {
        let site = self.build(NewSite {
            owner_id,
            slug: slug.to_owned(),
            github_repo: repo.to_owned(),
            github_branch: branch.to_owned(),
            subdirectory: subdirectory.to_owned(),
        });
        self.sites.write().unwrap().push(site);
        self
    }

    /// Number of stored sites.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(&self, site: NewSite) -> Site {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Site {
            id,
            owner_id: site.owner_id,
            slug: site.slug,
            github_repo: site.github_repo,
            github_branch: site.github_branch,
            subdirectory: site.subdirectory,
            // Seconds offset by id keeps creation order stable within a test.
            created_at: DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(id),
        }
    }

    fn check(&self) -> Result<(), RegistryError> {
        match &self.failure {
            Some(message) => Err(RegistryError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn find(&self, pred: impl Fn(&Site) -> bool) -> SiteLookup {
        if let Err(e) = self.check() {
            return SiteLookup::Failure(e);
        }
        match self.sites.read().unwrap().iter().find(|s| pred(s)) {
            Some(site) => SiteLookup::Found(site.clone()),
            None => SiteLookup::NotFound,
        }
    }
}

#[async_trait]
impl SiteRegistry for MemoryRegistry {
    async fn find_by_slug(&self, slug: &str) -> SiteLookup {
        self.find(|s| s.slug == slug)
    }

    async fn find_by_id(&self, id: i64) -> SiteLookup {
        self.find(|s| s.id == id)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Site>, RegistryError> {
        self.check()?;
        let mut sites: Vec<Site> = self
            .sites
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        sites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(sites)
    }

    async fn create(&self, site: NewSite) -> Result<Site, RegistryError> {
        self.check()?;
        let mut sites = self.sites.write().unwrap();
        if sites.iter().any(|s| s.slug == site.slug) {
            return Err(RegistryError::SlugTaken(site.slug));
        }
        let created = self.build(site);
        sites.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<(), RegistryError> {
        self.check()?;
        self.sites.write().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_site(owner_id: i64, slug: &str) -> NewSite {
        NewSite {
            owner_id,
            slug: slug.to_owned(),
            github_repo: "octo/handbook".to_owned(),
            github_branch: "main".to_owned(),
            subdirectory: String::new(),
        }
    }

    #[tokio::test]
    async fn test_seeded_site_found() {
        let registry = MemoryRegistry::new().with_site("docs", "octo/handbook", "main", "guide");

        let site = registry.find_by_slug("docs").await.into_result().unwrap().unwrap();

        assert_eq!(site.subdirectory, "guide");
        assert_eq!(site.owner_id, 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let registry = MemoryRegistry::new().with_site("docs", "octo/handbook", "main", "");

        let err = registry.create(new_site(2, "docs")).await.unwrap_err();

        assert!(matches!(err, RegistryError::SlugTaken(_)));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let registry = MemoryRegistry::new();
        registry.create(new_site(3, "a")).await.unwrap();
        registry.create(new_site(3, "b")).await.unwrap();
        registry.create(new_site(4, "c")).await.unwrap();

        let slugs: Vec<_> = registry
            .list_by_owner(3)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();

        assert_eq!(slugs, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_failing_registry_reports_failure() {
        let registry = MemoryRegistry::failing("connection refused");

        assert!(matches!(
            registry.find_by_slug("docs").await,
            SiteLookup::Failure(RegistryError::Unavailable(_))
        ));
        assert!(registry.list_by_owner(1).await.is_err());
        assert!(registry.create(new_site(1, "docs")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_site() {
        let registry = MemoryRegistry::new().with_site("docs", "octo/handbook", "main", "");
        let id = registry.find_by_slug("docs").await.into_result().unwrap().unwrap().id;

        registry.delete(id).await.unwrap();

        assert!(registry.is_empty());
        assert!(matches!(registry.find_by_slug("docs").await, SiteLookup::NotFound));
    }
}
