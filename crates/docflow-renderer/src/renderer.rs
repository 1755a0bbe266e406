//! Generic markdown renderer with pluggable backend.

use std::fmt::Write;
use std::marker::PhantomData;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::alert::{AlertKind, AlertRewriter};
use crate::backend::RenderBackend;
use crate::state::{Capture, OpenHeading, Outline, TableLayout, TocEntry, escape_html};
use crate::util::{fence_language, heading_level_to_num};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Number of blockquotes rendered as alerts.
    pub alerts: usize,
}

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate element styling while handling
/// document structure (headings, tables, lists, inline formatting) generically.
/// Every event stream passes through [`AlertRewriter`] before rendering.
///
/// A renderer can be reused: each call to [`render`](Self::render) starts
/// from a clean document, heading ids included.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    capture: Option<Capture>,
    table: Option<TableLayout>,
    heading: Option<OpenHeading>,
    outline: Outline,
    gfm: bool,
    raw_html: bool,
    /// Alert kind per open blockquote, innermost last (`None` for plain quotes).
    quotes: Vec<Option<AlertKind>>,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            capture: None,
            table: None,
            heading: None,
            outline: Outline::default(),
            gfm: true,
            raw_html: false,
            quotes: Vec::new(),
            _backend: PhantomData,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    ///
    /// The parser's own alert syntax stays disabled; alerts are always
    /// detected by [`AlertRewriter`].
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Pass raw HTML from the markdown source through unescaped.
    ///
    /// Disabled by default: raw HTML is rendered as visible text.
    #[must_use]
    pub fn with_raw_html(mut self, enabled: bool) -> Self {
        self.raw_html = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(self.create_parser(markdown))
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut events = AlertRewriter::new(events);
        for event in events.by_ref() {
            self.process_event(event);
        }

        self.capture = None;
        self.table = None;
        self.heading = None;
        self.quotes.clear();
        RenderResult {
            html: std::mem::take(&mut self.output),
            toc: std::mem::take(&mut self.outline).into_entries(),
            alerts: events.detected(),
        }
    }

    /// Append inline markup to the open heading, or to the output.
    ///
    /// Markup inside an image description is dropped; only its text reaches `alt`.
    fn push_inline(&mut self, content: &str) {
        if self.capture.is_some() {
            return;
        }
        match self.heading.as_mut() {
            Some(heading) => heading.html.push_str(content),
            None => self.output.push_str(content),
        }
    }

    /// Open an inline element through the backend.
    fn open_inline(&mut self, tag: &str, attrs: &str) {
        let mut buf = String::new();
        B::open_tag(tag, attrs, &mut buf);
        self.push_inline(&buf);
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => B::hard_break(&mut self.output),
            Event::Rule => B::horizontal_rule(&mut self.output),
            Event::TaskListMarker(checked) => B::task_list_marker(checked, &mut self.output),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => B::open_tag("p", "", &mut self.output),
            Tag::Heading { level, .. } => {
                self.heading = Some(OpenHeading::new(heading_level_to_num(level)));
            }
            Tag::BlockQuote(Some(kind)) => {
                let kind = AlertKind::from(kind);
                self.quotes.push(Some(kind));
                B::alert_start(kind, &mut self.output);
            }
            Tag::BlockQuote(None) => {
                self.quotes.push(None);
                B::blockquote_start(&mut self.output);
            }
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.capture = Some(Capture::Code {
                    language,
                    body: String::new(),
                });
            }
            Tag::List(Some(1)) => B::open_tag("ol", "", &mut self.output),
            Tag::List(Some(start)) => {
                B::open_tag("ol", &format!(r#" start="{start}""#), &mut self.output);
            }
            Tag::List(None) => B::open_tag("ul", "", &mut self.output),
            Tag::Item => B::open_tag("li", "", &mut self.output),
            Tag::DefinitionList => B::open_tag("dl", "", &mut self.output),
            Tag::DefinitionListTitle => B::open_tag("dt", "", &mut self.output),
            Tag::DefinitionListDefinition => B::open_tag("dd", "", &mut self.output),
            Tag::Table(alignments) => {
                self.table = Some(TableLayout::new(alignments));
                B::table_start(&mut self.output);
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.begin_row(true);
                }
                B::open_tag("thead", "", &mut self.output);
                self.output.push_str("<tr>");
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.begin_row(false);
                }
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let (tag, style) = self
                    .table
                    .as_ref()
                    .map_or(("td", ""), |t| (t.cell_tag(), t.cell_style()));
                B::open_tag(tag, style, &mut self.output);
            }
            Tag::Emphasis => self.open_inline("em", ""),
            Tag::Strong => self.open_inline("strong", ""),
            Tag::Strikethrough => self.open_inline("s", ""),
            Tag::Superscript => self.open_inline("sup", ""),
            Tag::Subscript => self.open_inline("sub", ""),
            Tag::Link { dest_url, .. } => {
                let attrs = format!(r#" href="{}"{}"#, escape_html(&dest_url), B::link_attrs());
                self.open_inline("a", &attrs);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.capture = Some(Capture::ImageAlt {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                });
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.take() {
                    let id = self.outline.add(heading.level, &heading.text);
                    let tag = format!("h{}", heading.level);
                    B::open_tag(&tag, &format!(r#" id="{id}""#), &mut self.output);
                    let _ = write!(self.output, "{}</{tag}>", heading.html.trim());
                }
            }
            TagEnd::BlockQuote(_) => match self.quotes.pop().flatten() {
                Some(kind) => B::alert_end(kind, &mut self.output),
                None => B::blockquote_end(&mut self.output),
            },
            TagEnd::CodeBlock => {
                if let Some(Capture::Code { language, body }) = self.capture.take() {
                    B::code_block(language.as_deref(), &body, &mut self.output);
                }
            }
            TagEnd::Image => {
                if let Some(Capture::ImageAlt { src, title, alt }) = self.capture.take() {
                    B::image(&src, &alt, &title, &mut self.output);
                }
            }
            TagEnd::List(true) => self.output.push_str("</ol>"),
            TagEnd::List(false) => self.output.push_str("</ul>"),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => {
                self.table = None;
                self.output.push_str("</tbody>");
                B::table_end(&mut self.output);
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_head();
                }
                self.output.push_str("</tr></thead>");
                B::open_tag("tbody", "", &mut self.output);
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                let head = self.table.as_ref().is_some_and(TableLayout::in_head);
                self.output.push_str(if head { "</th>" } else { "</td>" });
                if let Some(table) = self.table.as_mut() {
                    table.next_cell();
                }
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.push(text);
            return;
        }
        let escaped = escape_html(text);
        match self.heading.as_mut() {
            Some(heading) => {
                heading.text.push_str(text);
                heading.html.push_str(&escaped);
            }
            None => self.output.push_str(&escaped),
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.push(code);
            return;
        }
        let mut buf = String::new();
        B::inline_code(code, &mut buf);
        if let Some(heading) = self.heading.as_mut() {
            heading.text.push_str(code);
        }
        self.push_inline(&buf);
    }

    fn raw_html(&mut self, html: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.push(html);
        } else if self.raw_html {
            self.push_inline(html);
        } else {
            self.push_inline(&escape_html(html));
        }
    }

    fn soft_break(&mut self) {
        match self.capture.as_mut() {
            Some(capture @ Capture::Code { .. }) => capture.push("\n"),
            Some(capture) => capture.push(" "),
            None => {
                if let Some(heading) = self.heading.as_mut() {
                    heading.text.push(' ');
                }
                self.push_inline("\n");
            }
        }
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}
