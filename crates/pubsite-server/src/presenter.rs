//! HTML document for a public site page.

use std::fmt::Write;

use pubsite_registry::Site;
use pubsite_renderer::escape_html;

/// Stylesheet giving rendered markdown sensible defaults.
const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

/// Link target of the footer credit.
const POWERED_BY_URL: &str = "https://internetpublishing.co";

const PAGE_STYLE: &str = "\
body { padding: 2rem; }
main { max-width: 800px; margin: 0 auto; }
.header { border-bottom: 1px solid var(--pico-muted-border-color); padding-bottom: 1rem; margin-bottom: 2rem; }
.footer { margin-top: 3rem; padding-top: 2rem; border-top: 1px solid var(--pico-muted-border-color); text-align: center; color: var(--pico-muted-color); }
pre { overflow-x: auto; }
code { font-size: 0.9em; }
";

/// Wrap a rendered fragment in the public site layout.
///
/// Site metadata is escaped; `html` is trusted and inserted as-is.
pub fn public_site(site: &Site, html: &str) -> String {
    let slug = escape_html(&site.slug);
    let repo = escape_html(&site.github_repo);

    let mut doc = String::with_capacity(html.len() + 2048);
    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("<meta charset=\"utf-8\">\n");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(doc, "<title>{slug} - {repo}</title>");
    let _ = writeln!(doc, "<link rel=\"stylesheet\" href=\"{PICO_CSS}\">");
    let _ = writeln!(doc, "<style>\n{PAGE_STYLE}</style>");
    doc.push_str("</head>\n<body>\n");

    doc.push_str("<header class=\"header\">\n");
    let _ = writeln!(doc, "<h1>{slug}</h1>");
    let _ = writeln!(
        doc,
        "<p>Published from <a href=\"https://github.com/{repo}\" target=\"_blank\">{repo}</a></p>"
    );
    doc.push_str("</header>\n");

    doc.push_str("<main>\n");
    doc.push_str(html);
    doc.push_str("\n</main>\n");

    doc.push_str("<footer class=\"footer\">\n");
    let _ = writeln!(
        doc,
        "<small>Powered by <a href=\"{POWERED_BY_URL}\">Internet Publishing</a></small>"
    );
    doc.push_str("</footer>\n</body>\n</html>\n");

    doc
}
