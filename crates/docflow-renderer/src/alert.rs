//! GitHub-style alerts (callouts) in blockquotes.
//!
//! A blockquote becomes a callout when the first text run of its first
//! paragraph starts with one of the markers below:
//!
//! ```markdown
//! > [!WARNING]
//! > Disk usage above 90%.
//! ```
//!
//! Detection lives in [`classify_and_strip`], a pure function over the first
//! text run. [`AlertRewriter`] applies it to a `pulldown-cmark` event stream and
//! records the result as the blockquote's [`BlockQuoteKind`], which backends
//! branch on. The export script re-applies the same rule to rendered HTML using
//! [`TAG_PATTERN_SOURCE`] and [`ALERT_STYLES`].

use std::collections::VecDeque;
use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::{BlockQuoteKind, CowStr, Event, Tag, TagEnd};
use regex::Regex;

/// Tag pattern shared with the client-side export script.
///
/// Matched case-insensitively and anchored at the start of the first text run.
pub const TAG_PATTERN_SOURCE: &str = r"^\[!(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\]";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){TAG_PATTERN_SOURCE}")).unwrap());

/// Alert type of a callout blockquote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// All alert kinds, in [`ALERT_STYLES`] order.
    pub const ALL: [Self; 5] = [
        Self::Note,
        Self::Tip,
        Self::Important,
        Self::Warning,
        Self::Caution,
    ];

    /// Canonical (uppercase) keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Tip => "TIP",
            Self::Important => "IMPORTANT",
            Self::Warning => "WARNING",
            Self::Caution => "CAUTION",
        }
    }

    /// Parse a keyword, ignoring ASCII case.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(keyword))
    }

    /// Presentation of this alert kind.
    #[must_use]
    pub fn style(self) -> &'static AlertStyle {
        &ALERT_STYLES[self as usize]
    }
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

impl From<AlertKind> for BlockQuoteKind {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Note => Self::Note,
            AlertKind::Tip => Self::Tip,
            AlertKind::Important => Self::Important,
            AlertKind::Warning => Self::Warning,
            AlertKind::Caution => Self::Caution,
        }
    }
}

/// Icon, title and colors for one alert kind.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlertStyle {
    /// Alert kind this entry describes.
    pub kind: AlertKind,
    /// Human-readable title shown above the callout body.
    pub title: &'static str,
    /// Lowercase identifier used in CSS class names.
    pub slug: &'static str,
    /// SVG path data of the icon (16x16 view box).
    pub icon_path: &'static str,
    /// Border, background and text color utility classes.
    pub classes: &'static str,
}

impl AlertStyle {
    /// Render the icon as an inline SVG element.
    #[must_use]
    pub fn icon_svg(&self, class: &str, size: u32) -> String {
        let mut svg = String::with_capacity(self.icon_path.len() + 160);
        let _ = write!(
            svg,
            r#"<svg class="{class}" viewBox="0 0 16 16" width="{size}" height="{size}" fill="currentColor" aria-hidden="true"><path d="{}"></path></svg>"#,
            self.icon_path
        );
        svg
    }
}

/// Alert presentation table, indexed by `AlertKind as usize`.
pub static ALERT_STYLES: [AlertStyle; 5] = [
    AlertStyle {
        kind: AlertKind::Note,
        title: "Note",
        slug: "note",
        icon_path: "M0 8a8 8 0 1 1 16 0A8 8 0 0 1 0 8Zm8-6.5a6.5 6.5 0 1 0 0 13 6.5 6.5 0 0 0 0-13ZM6.5 7.75A.75.75 0 0 1 7.25 7h1a.75.75 0 0 1 .75.75v2.75h.25a.75.75 0 0 1 0 1.5h-2a.75.75 0 0 1 0-1.5h.25v-2h-.25a.75.75 0 0 1-.75-.75ZM8 6a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z",
        classes: "border-blue-500 bg-blue-500/10 text-blue-200",
    },
    AlertStyle {
        kind: AlertKind::Tip,
        title: "Tip",
        slug: "tip",
        icon_path: "M8 1.5c-2.363 0-4 1.69-4 3.75 0 .984.424 1.625.984 2.304l.214.253c.223.264.47.556.673.848.284.411.537.896.621 1.49a.75.75 0 0 1-1.484.211c-.04-.282-.163-.547-.37-.847a8.456 8.456 0 0 0-.542-.68c-.084-.1-.173-.205-.268-.32C3.201 7.75 2.5 6.766 2.5 5.25 2.5 2.31 4.863 0 8 0s5.5 2.31 5.5 5.25c0 1.516-.701 2.5-1.328 3.259-.095.115-.184.22-.268.319-.207.245-.383.453-.541.681-.208.3-.33.565-.37.847a.751.751 0 0 1-1.485-.212c.084-.593.337-1.078.621-1.489.203-.292.45-.584.673-.848.075-.088.147-.173.213-.253.561-.679.985-1.32.985-2.304 0-2.06-1.637-3.75-4-3.75ZM5.75 12h4.5a.75.75 0 0 1 0 1.5h-4.5a.75.75 0 0 1 0-1.5ZM6 15.25a.75.75 0 0 1 .75-.75h2.5a.75.75 0 0 1 0 1.5h-2.5a.75.75 0 0 1-.75-.75Z",
        classes: "border-green-500 bg-green-500/10 text-green-200",
    },
    AlertStyle {
        kind: AlertKind::Important,
        title: "Important",
        slug: "important",
        icon_path: "M0 1.75C0 .784.784 0 1.75 0h12.5C15.216 0 16 .784 16 1.75v9.5A1.75 1.75 0 0 1 14.25 13H8.06l-2.573 2.573A1.458 1.458 0 0 1 3 14.543V13H1.75A1.75 1.75 0 0 1 0 11.25Zm1.75-.25a.25.25 0 0 0-.25.25v9.5c0 .138.112.25.25.25h2a.75.75 0 0 1 .75.75v2.19l2.72-2.72a.749.749 0 0 1 .53-.22h6.5a.25.25 0 0 0 .25-.25v-9.5a.25.25 0 0 0-.25-.25Zm7 2.25v2.5a.75.75 0 0 1-1.5 0v-2.5a.75.75 0 0 1 1.5 0ZM9 9a1 1 0 1 1-2 0 1 1 0 0 1 2 0Z",
        classes: "border-purple-500 bg-purple-500/10 text-purple-200",
    },
    AlertStyle {
        kind: AlertKind::Warning,
        title: "Warning",
        slug: "warning",
        icon_path: "M6.457 1.047c.659-1.234 2.427-1.234 3.086 0l6.082 11.378A1.75 1.75 0 0 1 14.082 15H1.918a1.75 1.75 0 0 1-1.543-2.575Zm1.763.707a.25.25 0 0 0-.44 0L1.698 13.132a.25.25 0 0 0 .22.368h12.164a.25.25 0 0 0 .22-.368Zm.53 3.996v2.5a.75.75 0 0 1-1.5 0v-2.5a.75.75 0 0 1 1.5 0ZM9 11a1 1 0 1 1-2 0 1 1 0 0 1 2 0Z",
        classes: "border-amber-500 bg-amber-500/10 text-amber-200",
    },
    AlertStyle {
        kind: AlertKind::Caution,
        title: "Caution",
        slug: "caution",
        icon_path: "M4.47.22A.749.749 0 0 1 5 0h6c.199 0 .389.079.53.22l4.25 4.25c.141.14.22.331.22.53v6a.749.749 0 0 1-.22.53l-4.25 4.25A.749.749 0 0 1 11 16H5a.749.749 0 0 1-.53-.22L.22 11.53A.749.749 0 0 1 0 11V5c0-.199.079-.389.22-.53Zm.84 1.28L1.5 5.31v5.38l3.81 3.81h5.38l3.81-3.81V5.31L10.69 1.5ZM8 4a.75.75 0 0 1 .75.75v3.5a.75.75 0 0 1-1.5 0v-3.5A.75.75 0 0 1 8 4Zm0 8a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z",
        classes: "border-red-500 bg-red-500/10 text-red-200",
    },
];

/// Result of [`classify_and_strip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classified<'a> {
    /// Detected alert kind, `None` when the text carries no tag.
    pub kind: Option<AlertKind>,
    /// Text with the tag and its trailing separator removed.
    ///
    /// Equal to the input when no tag was detected.
    pub remainder: &'a str,
}

/// Detect a leading alert tag and strip it.
///
/// Only the whitespace run directly after the tag is removed; whitespace
/// before the tag disqualifies the match.
///
/// ```
/// use docflow_renderer::{AlertKind, classify_and_strip};
///
/// let result = classify_and_strip("[!tip] Use the cache.");
/// assert_eq!(result.kind, Some(AlertKind::Tip));
/// assert_eq!(result.remainder, "Use the cache.");
/// ```
#[must_use]
pub fn classify_and_strip(first_text: &str) -> Classified<'_> {
    let unmatched = Classified {
        kind: None,
        remainder: first_text,
    };
    let Some(captures) = TAG_PATTERN.captures(first_text) else {
        return unmatched;
    };
    let (Some(tag), Some(keyword)) = (captures.get(0), captures.get(1)) else {
        return unmatched;
    };
    match AlertKind::parse(keyword.as_str()) {
        Some(kind) => Classified {
            kind: Some(kind),
            remainder: first_text[tag.end()..].trim_start(),
        },
        None => unmatched,
    }
}

/// Create an [`AlertRewriter`] over a markdown event stream.
pub fn rewrite_alerts<'a, I>(events: I) -> AlertRewriter<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    AlertRewriter::new(events)
}

/// Event stream adapter that turns tagged blockquotes into alerts.
///
/// Plain blockquotes (`Tag::BlockQuote(None)`) whose first paragraph starts
/// with an alert tag are re-emitted as `Tag::BlockQuote(Some(kind))` with the
/// tag removed from the text. Blockquotes that already carry a kind pass
/// through untouched. Consecutive text events of the first paragraph are
/// merged, since the parser splits text at brackets.
pub struct AlertRewriter<'a, I> {
    inner: I,
    lookahead: VecDeque<Event<'a>>,
    /// Kinds of the currently open blockquotes, innermost last.
    open: Vec<Option<BlockQuoteKind>>,
    detected: usize,
}

impl<'a, I> AlertRewriter<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            lookahead: VecDeque::new(),
            open: Vec::new(),
            detected: 0,
        }
    }

    /// Number of blockquotes converted to alerts so far.
    pub fn detected(&self) -> usize {
        self.detected
    }

    fn pull(&mut self) -> Option<Event<'a>> {
        self.lookahead.pop_front().or_else(|| self.inner.next())
    }

    /// Put events back in front of the stream, preserving their order.
    fn requeue(&mut self, events: Vec<Event<'a>>) {
        for event in events.into_iter().rev() {
            self.lookahead.push_front(event);
        }
    }

    /// Inspect the content of a freshly opened plain blockquote.
    ///
    /// Everything read ahead is requeued, rewritten when a tag matched.
    fn classify_blockquote(&mut self) -> Option<AlertKind> {
        match self.pull() {
            Some(Event::Start(Tag::Paragraph)) => {}
            Some(other) => {
                self.requeue(vec![other]);
                return None;
            }
            None => return None,
        }

        let mut text = String::new();
        let mut has_text = false;
        let following = loop {
            match self.pull() {
                Some(Event::Text(part)) => {
                    text.push_str(&part);
                    has_text = true;
                }
                other => break other,
            }
        };

        let classified = if has_text {
            classify_and_strip(&text)
        } else {
            Classified {
                kind: None,
                remainder: "",
            }
        };
        let stripped = classified
            .kind
            .map(|kind| (kind, text.len() - classified.remainder.len()));

        let mut events = vec![Event::Start(Tag::Paragraph)];
        let Some((kind, offset)) = stripped else {
            if has_text {
                events.push(Event::Text(CowStr::from(text)));
            }
            events.extend(following);
            self.requeue(events);
            return None;
        };

        let remainder = text.split_off(offset);
        let emptied = remainder.is_empty();
        events.push(Event::Text(CowStr::from(remainder)));
        match following {
            // The line break after a lone tag separates it from the prose.
            Some(Event::SoftBreak | Event::HardBreak) if emptied => {}
            Some(event) => events.push(event),
            None => {}
        }
        self.requeue(events);
        Some(kind)
    }
}

impl<'a, I> Iterator for AlertRewriter<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.pull()?;
        let event = match event {
            Event::Start(Tag::BlockQuote(None)) => {
                let kind = self.classify_blockquote().map(|kind| {
                    self.detected += 1;
                    tracing::debug!(kind = kind.as_str(), "Detected alert blockquote");
                    BlockQuoteKind::from(kind)
                });
                self.open.push(kind);
                Event::Start(Tag::BlockQuote(kind))
            }
            Event::Start(Tag::BlockQuote(kind)) => {
                self.open.push(kind);
                Event::Start(Tag::BlockQuote(kind))
            }
            Event::End(TagEnd::BlockQuote(kind)) => {
                Event::End(TagEnd::BlockQuote(self.open.pop().unwrap_or(kind)))
            }
            other => other,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn parse(markdown: &str) -> Vec<Event<'static>> {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        Parser::new_ext(markdown, options)
            .map(Event::into_static)
            .collect()
    }

    fn rewrite(markdown: &str) -> Vec<Event<'static>> {
        rewrite_alerts(parse(markdown).into_iter()).collect()
    }

    fn blockquote_kinds(events: &[Event<'_>]) -> Vec<Option<BlockQuoteKind>> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::Start(Tag::BlockQuote(kind)) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    fn texts(events: &[Event<'_>]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::Text(text) => Some(text.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_classify_all_keywords() {
        for kind in AlertKind::ALL {
            let input = format!("[!{}] Some prose here.", kind.as_str());
            let result = classify_and_strip(&input);
            assert_eq!(result.kind, Some(kind));
            assert_eq!(result.remainder, "Some prose here.");
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        for input in ["[!note] x", "[!Note] x", "[!NOTE] x", "[!nOtE] x"] {
            let result = classify_and_strip(input);
            assert_eq!(result.kind, Some(AlertKind::Note), "input: {input}");
            assert_eq!(result.remainder, "x");
        }
    }

    #[test]
    fn test_classify_no_tag() {
        let result = classify_and_strip("Just a quote");
        assert_eq!(result.kind, None);
        assert_eq!(result.remainder, "Just a quote");
    }

    #[test]
    fn test_classify_unknown_tag() {
        let result = classify_and_strip("[!DANGER] text");
        assert_eq!(result.kind, None);
        assert_eq!(result.remainder, "[!DANGER] text");
    }

    #[test]
    fn test_classify_leading_whitespace_disqualifies() {
        let result = classify_and_strip(" [!NOTE] text");
        assert_eq!(result.kind, None);
        assert_eq!(result.remainder, " [!NOTE] text");
    }

    #[test]
    fn test_classify_trims_only_separator() {
        let result = classify_and_strip("[!NOTE]   keep  inner  spacing ");
        assert_eq!(result.remainder, "keep  inner  spacing ");
    }

    #[test]
    fn test_classify_tag_only() {
        let result = classify_and_strip("[!TIP]");
        assert_eq!(result.kind, Some(AlertKind::Tip));
        assert_eq!(result.remainder, "");
    }

    #[test]
    fn test_classify_tag_without_separator() {
        let result = classify_and_strip("[!WARNING]Careful");
        assert_eq!(result.kind, Some(AlertKind::Warning));
        assert_eq!(result.remainder, "Careful");
    }

    #[test]
    fn test_style_table_matches_kinds() {
        for kind in AlertKind::ALL {
            assert_eq!(kind.style().kind, kind);
            assert_eq!(kind.style().slug, kind.as_str().to_lowercase());
        }
    }

    #[test]
    fn test_parse_keyword() {
        assert_eq!(AlertKind::parse("caution"), Some(AlertKind::Caution));
        assert_eq!(AlertKind::parse("Important"), Some(AlertKind::Important));
        assert_eq!(AlertKind::parse("DANGER"), None);
    }

    #[test]
    fn test_block_quote_kind_conversion() {
        for kind in AlertKind::ALL {
            assert_eq!(AlertKind::from(BlockQuoteKind::from(kind)), kind);
        }
    }

    #[test]
    fn test_icon_svg() {
        let svg = AlertKind::Warning.style().icon_svg("alert-icon", 18);
        assert!(svg.starts_with(r#"<svg class="alert-icon""#));
        assert!(svg.contains(r#"width="18" height="18""#));
        assert!(svg.contains(AlertKind::Warning.style().icon_path));
    }

    #[test]
    fn test_rewrite_tag_on_own_line() {
        let events = rewrite("> [!WARNING]\n> Disk usage above 90%.");
        assert_eq!(
            blockquote_kinds(&events),
            vec![Some(BlockQuoteKind::Warning)]
        );
        assert_eq!(texts(&events), vec!["", "Disk usage above 90%."]);
        assert!(!events.contains(&Event::SoftBreak));
        assert!(events.contains(&Event::End(TagEnd::BlockQuote(Some(
            BlockQuoteKind::Warning
        )))));
    }

    #[test]
    fn test_rewrite_tag_with_inline_prose() {
        let events = rewrite("> [!note] Read this first.");
        assert_eq!(blockquote_kinds(&events), vec![Some(BlockQuoteKind::Note)]);
        assert_eq!(texts(&events), vec!["Read this first."]);
    }

    #[test]
    fn test_rewrite_tag_alone_keeps_empty_text() {
        let events = rewrite("> [!TIP]");
        assert_eq!(blockquote_kinds(&events), vec![Some(BlockQuoteKind::Tip)]);
        assert_eq!(texts(&events), vec![""]);
    }

    #[test]
    fn test_rewrite_plain_blockquote_untouched() {
        let events = rewrite("> Just a regular quote");
        assert_eq!(blockquote_kinds(&events), vec![None]);
        assert_eq!(texts(&events), vec!["Just a regular quote"]);
    }

    #[test]
    fn test_rewrite_unknown_tag_stays_visible() {
        let events = rewrite("> [!DANGER] text");
        assert_eq!(blockquote_kinds(&events), vec![None]);
        assert_eq!(texts(&events).concat(), "[!DANGER] text");
    }

    #[test]
    fn test_rewrite_first_inline_not_text() {
        let events = rewrite("> **[!NOTE]** bold first");
        assert_eq!(blockquote_kinds(&events), vec![None]);
        assert!(texts(&events).concat().contains("[!NOTE]"));
    }

    #[test]
    fn test_rewrite_first_block_not_paragraph() {
        let events = rewrite("> - [!NOTE] in a list");
        assert_eq!(blockquote_kinds(&events), vec![None]);
        assert!(texts(&events).concat().contains("[!NOTE]"));
    }

    #[test]
    fn test_rewrite_only_first_tag() {
        let events = rewrite("> [!NOTE] First.\n>\n> [!TIP] Second.");
        assert_eq!(blockquote_kinds(&events), vec![Some(BlockQuoteKind::Note)]);
        let texts = texts(&events);
        assert_eq!(texts[0], "First.");
        assert_eq!(texts[1..].concat(), "[!TIP] Second.");
    }

    #[test]
    fn test_rewrite_nested_blockquotes() {
        let events = rewrite("> [!IMPORTANT] Outer\n>\n> > [!caution] Inner");
        assert_eq!(
            blockquote_kinds(&events),
            vec![
                Some(BlockQuoteKind::Important),
                Some(BlockQuoteKind::Caution)
            ]
        );
        let ends: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::End(TagEnd::BlockQuote(kind)) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            ends,
            vec![
                Some(BlockQuoteKind::Caution),
                Some(BlockQuoteKind::Important)
            ]
        );
    }

    #[test]
    fn test_rewrite_nested_plain_outer() {
        let events = rewrite("> > [!TIP] Inner only");
        assert_eq!(
            blockquote_kinds(&events),
            vec![None, Some(BlockQuoteKind::Tip)]
        );
    }

    #[test]
    fn test_rewrite_keeps_following_blocks() {
        let events = rewrite("> [!WARNING]\n> Be careful:\n>\n> - Item 1\n> - Item 2");
        assert_eq!(texts(&events), vec!["", "Be careful:", "Item 1", "Item 2"]);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let once: Vec<_> = rewrite("> [!NOTE]\n> Body\n\n> Plain");
        let twice: Vec<_> = rewrite_alerts(once.clone().into_iter()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewriter_counts_detected() {
        let mut rewriter = rewrite_alerts(parse("> [!NOTE] a\n\n> b\n\n> [!TIP] c").into_iter());
        let _ = rewriter.by_ref().count();
        assert_eq!(rewriter.detected(), 2);
    }

    #[test]
    fn test_rewrite_outside_blockquote_untouched() {
        let events = rewrite("[!NOTE] not in a quote");
        assert_eq!(blockquote_kinds(&events), Vec::<Option<BlockQuoteKind>>::new());
        assert!(texts(&events).concat().starts_with("[!NOTE]"));
    }
}
