//! HTML writer for pulldown-cmark events.
//!
//! # Architecture
//!
//! The writer is a state machine fed one event at a time:
//! - `CodeBlockState`: buffers fenced and indented code
//! - `TableState`: header row flag, alignments and current cell
//! - `ImageState`: captures alt text while inside an image
//! - `HeadingState`: buffers heading text and HTML until the id is known
//!
//! One writer renders one document and is then consumed, so heading ids
//! never leak between documents.

use std::fmt::Write;

use pulldown_cmark::{Alignment, BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::autolink;
use crate::heading::HeadingIds;

#[derive(Default)]
struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }
}

#[derive(Default)]
struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    fn current_alignment(&self) -> Option<&Alignment> {
        self.alignments.get(self.cell_index)
    }
}

#[derive(Default)]
struct ImageState {
    /// Nesting depth; images inside image alt text are flattened.
    depth: usize,
    alt_text: String,
}

#[derive(Default)]
struct HeadingState {
    level: Option<u8>,
    /// Plain text used for the id.
    text: String,
    /// Inline HTML rendered inside the heading.
    html: String,
    ids: HeadingIds,
}

impl HeadingState {
    fn is_active(&self) -> bool {
        self.level.is_some()
    }

    fn start(&mut self, level: u8) {
        self.level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Finish the heading, returning `(level, id, html)`.
    fn complete(&mut self) -> Option<(u8, String, String)> {
        let level = self.level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let id = self.ids.assign(&text);
        Some((level, id, html))
    }
}

/// Renders one document's events to an HTML fragment.
pub(crate) struct HtmlWriter {
    output: String,
    autolinks: bool,
    /// Depth of open markdown links; bare URLs are not linked inside one.
    link_depth: usize,
    /// Depth of raw `<a>` elements opened through inline HTML.
    raw_link_depth: usize,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
}

impl HtmlWriter {
    pub(crate) fn new(autolinks: bool, capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            autolinks,
            link_depth: 0,
            raw_link_depth: 0,
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
        }
    }

    pub(crate) fn render<'a, I>(mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.output
    }

    /// Buffer inline markup goes to: the open heading or the document.
    fn inline_out(&mut self) -> &mut String {
        if self.heading.is_active() {
            &mut self.heading.html
        } else {
            &mut self.output
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => self.inline_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.output.push_str("<hr>\n"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        if self.image.depth > 0 {
            if let Tag::Image { .. } = tag {
                self.image.depth += 1;
            }
            return;
        }

        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => self.heading.start(heading_level_to_num(level)),
            Tag::BlockQuote(kind) => {
                if let Some(kind) = kind {
                    write!(
                        self.output,
                        r#"<blockquote class="markdown-alert markdown-alert-{}">"#,
                        alert_class(kind)
                    )
                    .unwrap();
                    write!(
                        self.output,
                        r#"<p class="markdown-alert-title">{}</p>"#,
                        alert_title(kind)
                    )
                    .unwrap();
                } else {
                    self.output.push_str("<blockquote>\n");
                }
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(ToOwned::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>\n"),
            Tag::List(Some(start)) => write!(self.output, r#"<ol start="{start}">"#).unwrap(),
            Tag::List(None) => self.output.push_str("<ul>\n"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell_index = 0;
                self.output.push_str("<thead>\n<tr>");
            }
            Tag::TableRow => {
                self.table.cell_index = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let cell = if self.table.in_head { "th" } else { "td" };
                let align = match self.table.current_alignment() {
                    Some(Alignment::Left) => r#" style="text-align:left""#,
                    Some(Alignment::Center) => r#" style="text-align:center""#,
                    Some(Alignment::Right) => r#" style="text-align:right""#,
                    Some(Alignment::None) | None => "",
                };
                write!(self.output, "<{cell}{align}>").unwrap();
            }
            Tag::Emphasis => self.inline_out().push_str("<em>"),
            Tag::Strong => self.inline_out().push_str("<strong>"),
            Tag::Strikethrough => self.inline_out().push_str("<del>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.link_depth += 1;
                let out = self.inline_out();
                write!(out, r#"<a href="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(out, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                out.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image.depth = 1;
                self.image.alt_text.clear();
                let out = self.inline_out();
                write!(out, r#"<img src="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(out, r#" title="{}""#, escape_html(&title)).unwrap();
                }
            }
            Tag::DefinitionList => self.output.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Superscript => self.inline_out().push_str("<sup>"),
            Tag::Subscript => self.inline_out().push_str("<sub>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if self.image.depth > 0 {
            if tag != TagEnd::Image {
                return;
            }
            self.image.depth -= 1;
            if self.image.depth == 0 {
                let alt = std::mem::take(&mut self.image.alt_text);
                write!(self.inline_out(), r#" alt="{}">"#, escape_html(&alt)).unwrap();
            }
            return;
        }

        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete() {
                    writeln!(
                        self.output,
                        r#"<h{level} id="{}">{}</h{level}>"#,
                        escape_html(&id),
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                let (lang, buffer) = self.code.end();
                match lang {
                    Some(lang) => write!(
                        self.output,
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(&lang),
                        escape_html(&buffer)
                    )
                    .unwrap(),
                    None => write!(
                        self.output,
                        "<pre><code>{}</code></pre>",
                        escape_html(&buffer)
                    )
                    .unwrap(),
                }
                self.output.push('\n');
            }
            TagEnd::List(true) => self.output.push_str("</ol>\n"),
            TagEnd::List(false) => self.output.push_str("</ul>\n"),
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::Table => self.output.push_str("</tbody>\n</table>\n"),
            TagEnd::TableHead => {
                self.output.push_str("</tr>\n</thead>\n<tbody>\n");
                self.table.in_head = false;
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                let cell = if self.table.in_head { "th" } else { "td" };
                write!(self.output, "</{cell}>").unwrap();
                self.table.cell_index += 1;
            }
            TagEnd::Emphasis => self.inline_out().push_str("</em>"),
            TagEnd::Strong => self.inline_out().push_str("</strong>"),
            TagEnd::Strikethrough => self.inline_out().push_str("</del>"),
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.inline_out().push_str("</a>");
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::Superscript => self.inline_out().push_str("</sup>"),
            TagEnd::Subscript => self.inline_out().push_str("</sub>"),
            TagEnd::Image
            | TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.active {
            self.code.buffer.push_str(text);
            return;
        }
        if self.image.depth > 0 {
            self.image.alt_text.push_str(text);
            return;
        }
        if self.heading.is_active() {
            self.heading.text.push_str(text);
        }

        let linkable = self.autolinks && self.link_depth == 0 && self.raw_link_depth == 0;
        let out = self.inline_out();
        if linkable {
            autolink::push_linked(out, text);
        } else {
            out.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.depth > 0 {
            self.image.alt_text.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.text.push_str(code);
        }
        write!(self.inline_out(), "<code>{}</code>", escape_html(code)).unwrap();
    }

    fn inline_html(&mut self, html: &str) {
        // Alt text is plain text; markup inside it is dropped.
        if self.image.depth > 0 {
            return;
        }
        let tag = html.trim_start_matches('<');
        if is_anchor_open(tag) {
            self.raw_link_depth += 1;
        } else if tag.len() >= 2 && tag[..2].eq_ignore_ascii_case("/a") {
            self.raw_link_depth = self.raw_link_depth.saturating_sub(1);
        }
        self.inline_out().push_str(html);
    }

    fn soft_break(&mut self) {
        if self.image.depth > 0 {
            self.image.alt_text.push(' ');
        } else {
            self.inline_out().push('\n');
        }
    }

    fn hard_break(&mut self) {
        if self.image.depth > 0 {
            self.image.alt_text.push(' ');
        } else {
            self.inline_out().push_str("<br>\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.output
                .push_str(r#"<input type="checkbox" checked="" disabled="" /> "#);
        } else {
            self.output.push_str(r#"<input type="checkbox" disabled="" /> "#);
        }
    }
}

/// Whether inline HTML (without its leading `<`) opens an `<a>` element.
fn is_anchor_open(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some('a' | 'A'))
        && matches!(chars.next(), Some(c) if c == '>' || c.is_whitespace())
}

fn alert_class(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "note",
        BlockQuoteKind::Tip => "tip",
        BlockQuoteKind::Important => "important",
        BlockQuoteKind::Warning => "warning",
        BlockQuoteKind::Caution => "caution",
    }
}

fn alert_title(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "Note",
        BlockQuoteKind::Tip => "Tip",
        BlockQuoteKind::Important => "Important",
        BlockQuoteKind::Warning => "Warning",
        BlockQuoteKind::Caution => "Caution",
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
