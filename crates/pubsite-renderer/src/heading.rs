//! Heading anchor ids.

use std::collections::{HashMap, HashSet};

/// Id used when a heading has no alphanumeric characters.
const EMPTY_HEADING_ID: &str = "heading";

/// Convert heading text to an anchor slug.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen and trims hyphens from both ends.
pub(crate) fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if result.is_empty() {
        EMPTY_HEADING_ID.to_owned()
    } else {
        result
    }
}

/// Assigns unique anchor ids within one document.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    /// Next suffix to try per base slug.
    counts: HashMap<String, usize>,
    /// Every id handed out so far.
    used: HashSet<String>,
}

impl HeadingIds {
    /// Id for a heading with the given plain text.
    ///
    /// The first occurrence keeps the bare slug; repeats get `-1`, `-2`, ...
    /// skipping any suffix that is already taken by another heading.
    pub(crate) fn assign(&mut self, text: &str) -> String {
        let base = slugify(text);

        if self.used.insert(base.clone()) {
            self.counts.entry(base.clone()).or_insert(1);
            return base;
        }

        let next = self.counts.entry(base.clone()).or_insert(1);
        loop {
            let candidate = format!("{base}-{next}");
            *next += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("What's New?"), "what-s-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("snake_case and kebab-case"), "snake-case-and-kebab-case");
        assert_eq!(slugify("v1.2 (beta)"), "v1-2-beta");
        assert_eq!(slugify("Überblick"), "überblick");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify(""), "heading");
        assert_eq!(slugify("!!!"), "heading");
    }

    #[test]
    fn test_duplicates_get_suffix() {
        let mut ids = HeadingIds::default();

        assert_eq!(ids.assign("FAQ"), "faq");
        assert_eq!(ids.assign("FAQ"), "faq-1");
        assert_eq!(ids.assign("faq"), "faq-2");
    }

    #[test]
    fn test_suffix_skips_existing_id() {
        let mut ids = HeadingIds::default();

        assert_eq!(ids.assign("Intro 1"), "intro-1");
        assert_eq!(ids.assign("Intro"), "intro");
        assert_eq!(ids.assign("Intro"), "intro-2");
        assert_eq!(ids.assign("Intro 1"), "intro-1-1");
    }
}
