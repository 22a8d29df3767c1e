//! Slug extraction from the request host.

use crate::error::ResolveError;

/// Minimum number of dot-separated labels: `<slug>.<domain>.<tld>`.
const MIN_HOST_LABELS: usize = 3;

/// Extract the site slug from a `Host` value.
///
/// The slug is the first label. Deeper nesting (`docs.a.b.example.com`)
/// still resolves to the first label. Labels are not otherwise validated
/// and a `:port` suffix stays attached to the last label.
///
/// # Errors
///
/// Returns [`ResolveError::MalformedHost`] when the host has fewer than
/// three labels.
pub fn parse_host(host: &str) -> Result<&str, ResolveError> {
    let mut labels = host.split('.');
    let slug = labels.next().unwrap_or_default();

    if labels.count() + 1 < MIN_HOST_LABELS {
        return Err(ResolveError::MalformedHost(host.to_owned()));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_first_label() {
        assert_eq!(parse_host("docs.example.com").unwrap(), "docs");
        assert_eq!(parse_host("docs.pages.example.co.uk").unwrap(), "docs");
    }

    #[test]
    fn test_port_stays_on_last_label() {
        assert_eq!(parse_host("docs.example.com:8080").unwrap(), "docs");
        assert!(parse_host("example.com:8080").is_err());
    }

    #[test]
    fn test_too_few_labels() {
        for host in ["", "localhost", "example.com", "127.0"] {
            let err = parse_host(host).unwrap_err();
            assert!(matches!(err, ResolveError::MalformedHost(ref h) if h == host));
        }
    }

    #[test]
    fn test_empty_labels_counted() {
        assert_eq!(parse_host("..").unwrap(), "");
    }
}
