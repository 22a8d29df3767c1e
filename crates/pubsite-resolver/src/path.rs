//! Request path to repository file path mapping.

/// File served for the site root.
pub const README: &str = "README.md";

/// File tried when a `README.md` is missing.
pub const INDEX: &str = "index.md";

const MARKDOWN_EXT: &str = ".md";

/// Map a request path to the repository file to fetch.
///
/// Strips one leading `/`, defaults an empty path to `README.md`, appends
/// `.md` when missing and prefixes the site's subdirectory (its trailing
/// `/` removed).
///
/// ```
/// use pubsite_resolver::normalize_path;
///
/// assert_eq!(normalize_path("/guide", ""), "guide.md");
/// assert_eq!(normalize_path("/", "docs/"), "docs/README.md");
/// ```
#[must_use]
pub fn normalize_path(request_path: &str, subdirectory: &str) -> String {
    let path = request_path.strip_prefix('/').unwrap_or(request_path);

    let mut file = if path.is_empty() {
        README.to_owned()
    } else {
        path.to_owned()
    };
    if !file.ends_with(MARKDOWN_EXT) {
        file.push_str(MARKDOWN_EXT);
    }

    if subdirectory.is_empty() {
        file
    } else {
        format!("{}/{file}", subdirectory.trim_end_matches('/'))
    }
}

/// Fallback path for a missing `README.md`, keeping its directory.
///
/// Returns `None` when `path` does not end in `README.md`; only the
/// trailing occurrence is replaced.
#[must_use]
pub fn index_fallback(path: &str) -> Option<String> {
    path.strip_suffix(README)
        .map(|prefix| format!("{prefix}{INDEX}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_defaults_to_readme() {
        assert_eq!(normalize_path("", ""), "README.md");
        assert_eq!(normalize_path("/", ""), "README.md");
    }

    #[test]
    fn test_extension_appended_once() {
        assert_eq!(normalize_path("/guide", ""), "guide.md");
        assert_eq!(normalize_path("/guide.md", ""), "guide.md");
        assert_eq!(normalize_path("guide", ""), normalize_path("guide.md", ""));
    }

    #[test]
    fn test_only_one_leading_slash_stripped() {
        assert_eq!(normalize_path("//guide", ""), "/guide.md");
    }

    #[test]
    fn test_subdirectory_prefix() {
        assert_eq!(normalize_path("", "docs"), "docs/README.md");
        assert_eq!(normalize_path("/a/b", "docs/"), "docs/a/b.md");
        assert_eq!(normalize_path("/a/b", "nested/docs"), "nested/docs/a/b.md");
    }

    #[test]
    fn test_non_markdown_asset_coerced() {
        assert_eq!(normalize_path("/logo.png", ""), "logo.png.md");
    }

    #[test]
    fn test_index_fallback() {
        assert_eq!(index_fallback("README.md").as_deref(), Some("index.md"));
        assert_eq!(
            index_fallback("docs/README.md").as_deref(),
            Some("docs/index.md")
        );
        assert_eq!(
            index_fallback("README.md/README.md").as_deref(),
            Some("README.md/index.md")
        );
        assert_eq!(index_fallback("guide.md"), None);
        assert_eq!(index_fallback("readme.md"), None);
    }
}
