//! Bare URL linking in text runs.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::escape_html;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").unwrap());

/// Trailing characters never treated as part of a bare URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '"', '\'', '*', '_', '~'];

/// Trim trailing punctuation and unbalanced closing parentheses.
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate;
    loop {
        let before = url.len();
        url = url.trim_end_matches(TRAILING_PUNCTUATION);
        if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
        }
        if url.len() == before {
            return url;
        }
    }
}

/// Append `text` HTML-escaped to `out`, linking bare `http(s)://` and
/// `www.` URLs.
pub(crate) fn push_linked(out: &mut String, text: &str) {
    let mut last = 0;

    for m in URL_PATTERN.find_iter(text) {
        let url = trim_url(m.as_str());
        let is_www = url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.");
        let prefix_len = if is_www {
            4
        } else {
            url.find("://").map_or(url.len(), |i| i + 3)
        };
        // Nothing left after the prefix once punctuation is trimmed.
        if url.len() <= prefix_len {
            continue;
        }
        let start = m.start();
        let end = start + url.len();

        out.push_str(&escape_html(&text[last..start]));
        let href = if is_www {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        out.push_str(r#"<a href=""#);
        out.push_str(&escape_html(&href));
        out.push_str(r#"">"#);
        out.push_str(&escape_html(url));
        out.push_str("</a>");
        last = end;
    }

    out.push_str(&escape_html(&text[last..]));
}
