//! Per-render state of the markdown renderer.
//!
//! Everything here lives for one `render` call; the renderer takes it apart
//! when the event stream ends so nothing leaks into the next document.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// Text diverted away from the HTML output while an element is open.
pub(crate) enum Capture {
    /// Code block body, written escaped on close.
    Code {
        language: Option<String>,
        body: String,
    },
    /// Image description, written as the `alt` attribute on close.
    ImageAlt {
        src: String,
        title: String,
        alt: String,
    },
}

impl Capture {
    pub(crate) fn push(&mut self, text: &str) {
        match self {
            Self::Code { body, .. } => body.push_str(text),
            Self::ImageAlt { alt, .. } => alt.push_str(text),
        }
    }
}

/// Column cursor of the table being rendered.
pub(crate) struct TableLayout {
    alignments: Vec<Alignment>,
    column: usize,
    in_head: bool,
}

impl TableLayout {
    pub(crate) fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            column: 0,
            in_head: false,
        }
    }

    /// Move to the first cell of a new row; `head` marks the header row.
    pub(crate) fn begin_row(&mut self, head: bool) {
        self.in_head = head;
        self.column = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn in_head(&self) -> bool {
        self.in_head
    }

    pub(crate) fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    /// Inline style of the current cell, with a leading space.
    pub(crate) fn cell_style(&self) -> &'static str {
        match self.alignments.get(self.column) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }

    pub(crate) fn next_cell(&mut self) {
        self.column += 1;
    }
}

/// Heading whose content is still being collected.
///
/// The opening tag waits until the plain text is known, since the anchor id
/// is derived from it.
pub(crate) struct OpenHeading {
    pub(crate) level: u8,
    pub(crate) text: String,
    pub(crate) html: String,
}

impl OpenHeading {
    pub(crate) fn new(level: u8) -> Self {
        Self {
            level,
            text: String::new(),
            html: String::new(),
        }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Headings seen so far in one document.
#[derive(Default)]
pub(crate) struct Outline {
    ids: UniqueIds,
    entries: Vec<TocEntry>,
}

impl Outline {
    /// Record a finished heading and return its anchor id.
    pub(crate) fn add(&mut self, level: u8, text: &str) -> String {
        let title = text.trim();
        let id = self.ids.unique(slugify(title));
        self.entries.push(TocEntry {
            level,
            title: title.to_owned(),
            id: id.clone(),
        });
        id
    }

    pub(crate) fn into_entries(self) -> Vec<TocEntry> {
        self.entries
    }
}

/// Generator of unique slugs within one document.
///
/// The first use of a slug is returned as is; repeats get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct UniqueIds {
    counts: HashMap<String, usize>,
}

impl UniqueIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `base` made unique among the ids handed out so far.
    pub fn unique(&mut self, base: String) -> String {
        let count = self.counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }
}

/// Convert text to URL-safe slug.
///
/// Words are separated by whitespace, `-` or `_`; within a word only ASCII
/// letters and digits survive, lowercased. Words are joined with single dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Escape HTML special characters.
///
/// The result is safe inside element content and quoted attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    for (i, c) in s.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => continue,
        };
        out.push_str(&s[copied..i]);
        out.push_str(entity);
        copied = i + c.len_utf8();
    }
    out.push_str(&s[copied..]);
    out
}
