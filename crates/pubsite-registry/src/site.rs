//! Site records and creation-time validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum slug length accepted at creation.
pub const MAX_SLUG_LEN: usize = 50;

static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

static REPO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+$").unwrap());

/// A published site: one slug mapped to a repository, branch and subdirectory.
///
/// Sites are read-only after creation; the only mutation is deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Site {
    /// Registry-assigned identifier.
    pub id: i64,
    /// User who created the site.
    pub owner_id: i64,
    /// Subdomain key, unique across the registry.
    pub slug: String,
    /// Repository in `owner/name` form.
    pub github_repo: String,
    /// Branch or ref files are read from.
    pub github_branch: String,
    /// Path prefix inside the repository; empty means the repository root.
    pub subdirectory: String,
    /// Registry-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for [`SiteRegistry::create`](crate::SiteRegistry::create).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewSite {
    /// User creating the site.
    #[serde(default)]
    pub owner_id: i64,
    /// Requested subdomain slug.
    pub slug: String,
    /// Repository in `owner/name` form.
    pub github_repo: String,
    /// Branch or ref.
    pub github_branch: String,
    /// Optional path prefix.
    #[serde(default)]
    pub subdirectory: String,
}

impl NewSite {
    /// Check field shapes before the site reaches the registry.
    ///
    /// Slug uniqueness is not checked here; the registry rejects duplicates.
    ///
    /// # Errors
    ///
    /// Returns every failing field with the first message for that field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.slug.is_empty() {
            errors.add("slug", "This field is required");
        } else if self.slug.chars().count() > MAX_SLUG_LEN {
            errors.add(
                "slug",
                format!("Must be at most {MAX_SLUG_LEN} characters"),
            );
        }
        if !SLUG_PATTERN.is_match(&self.slug) {
            errors.add(
                "slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            );
        }

        if self.github_repo.is_empty() {
            errors.add("github_repo", "This field is required");
        } else if !REPO_PATTERN.is_match(&self.github_repo) {
            errors.add(
                "github_repo",
                "Invalid repository format (use: username/repository)",
            );
        }

        if self.github_branch.is_empty() {
            errors.add("github_branch", "This field is required");
        }

        errors.into_result()
    }
}

/// Field-level validation failures, one message per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Record a message for `field` unless one is already present.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Whether `field` has a recorded failure.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the failing fields in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid fields: ")?;
        for (i, (field, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_site(slug: &str, repo: &str, branch: &str) -> NewSite {
        NewSite {
            owner_id: 1,
            slug: slug.to_owned(),
            github_repo: repo.to_owned(),
            github_branch: branch.to_owned(),
            subdirectory: String::new(),
        }
    }

    #[test]
    fn test_valid_site_passes() {
        assert!(new_site("my-docs-2", "octo/handbook", "main").validate().is_ok());
        assert!(new_site("a", "user_1/repo.name-x", "v1.0").validate().is_ok());
    }

    #[test]
    fn test_slug_rejects_uppercase_and_symbols() {
        for slug in ["MyDocs", "my_docs", "my.docs", "my docs", "é"] {
            let errors = new_site(slug, "octo/handbook", "main")
                .validate()
                .unwrap_err();
            assert_eq!(
                errors.get("slug"),
                Some("Slug must contain only lowercase letters, numbers, and hyphens"),
                "slug {slug:?}"
            );
        }
    }

    #[test]
    fn test_slug_length_limit() {
        let long = "a".repeat(MAX_SLUG_LEN + 1);
        let errors = new_site(&long, "octo/handbook", "main")
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("slug"), Some("Must be at most 50 characters"));

        let exact = "a".repeat(MAX_SLUG_LEN);
        assert!(new_site(&exact, "octo/handbook", "main").validate().is_ok());
    }

    #[test]
    fn test_repo_shape() {
        for repo in ["handbook", "octo/handbook/extra", "octo/", "/handbook", "octo/hand book"] {
            let errors = new_site("docs", repo, "main").validate().unwrap_err();
            assert!(errors.has("github_repo"), "repo {repo:?}");
            assert!(!errors.has("slug"));
        }
    }

    #[test]
    fn test_required_fields_reported_together() {
        let errors = new_site("", "", "").validate().unwrap_err();

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["github_branch", "github_repo", "slug"]
        );
        assert_eq!(errors.get("slug"), Some("This field is required"));
        assert_eq!(errors.get("github_repo"), Some("This field is required"));
    }

    #[test]
    fn test_validation_errors_serialize_as_map() {
        let mut errors = ValidationErrors::default();
        errors.add("slug", "This slug is already taken");
        errors.add("slug", "ignored second message");

        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json, serde_json::json!({"slug": "This slug is already taken"}));
    }

    #[test]
    fn test_new_site_deserialize_defaults() {
        let site: NewSite = serde_json::from_str(
            r#"{"slug": "docs", "github_repo": "octo/handbook", "github_branch": "main"}"#,
        )
        .unwrap();

        assert_eq!(site.owner_id, 0);
        assert_eq!(site.subdirectory, "");
    }
}
