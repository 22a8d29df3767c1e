//! GitHub-flavored markdown rendering for pubsite.
//!
//! [`MarkdownRenderer`] turns raw file bytes into an HTML fragment:
//! tables, strikethrough, task lists, alerts and bare-URL autolinks, with a
//! unique anchor id on every heading. Raw HTML in the source is passed
//! through unchanged.
//!
//! # Example
//!
//! ```
//! use pubsite_renderer::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render(b"## Hello\n\nSee https://example.com").unwrap();
//!
//! assert!(html.contains(r#"<h2 id="hello">Hello</h2>"#));
//! assert!(html.contains(r#"<a href="https://example.com">"#));
//! ```

mod autolink;
mod heading;
mod html;

use pulldown_cmark::{Options, Parser, TextMergeStream};

pub use html::escape_html;

use html::HtmlWriter;

/// Error from [`MarkdownRenderer::render`].
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source bytes are not valid UTF-8.
    #[error("markdown source is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Markdown to HTML renderer.
///
/// Configuration is fixed at construction; rendering takes `&self` and
/// keeps all per-document state local, so one renderer can be shared
/// across threads.
#[derive(Clone, Copy, Debug)]
pub struct MarkdownRenderer {
    gfm: bool,
    autolinks: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Renderer with GFM extensions and autolinks enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            autolinks: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Alerts (`> [!NOTE]`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable linking of bare `http(s)://` and `www.` URLs.
    #[must_use]
    pub fn with_autolinks(mut self, enabled: bool) -> Self {
        self.autolinks = enabled;
        self
    }

    /// Parser options for the current configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown source to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidUtf8`] when `source` is not UTF-8.
    pub fn render(&self, source: &[u8]) -> Result<String, RenderError> {
        let markdown = std::str::from_utf8(source)?;
        let parser = Parser::new_ext(markdown, self.parser_options());
        let writer = HtmlWriter::new(self.autolinks, markdown.len() * 3 / 2);
        Ok(writer.render(TextMergeStream::new(parser)))
    }
}
