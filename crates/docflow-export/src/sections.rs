//! Splitting a markdown document into titled sections.
//!
//! Sections start at top-level `# Heading`s (ATX or setext). Headings nested
//! in blockquotes or lists, and `#` lines inside code blocks, never split.

use docflow_renderer::{HtmlBackend, MarkdownRenderer, UniqueIds, slugify};
use pulldown_cmark::{Event, HeadingLevel, Tag, TagEnd};

/// Title of the section holding the text before the first heading.
pub const DEFAULT_OVERVIEW_TITLE: &str = "Overview";

/// A titled slice of a markdown document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Unique URL-safe identifier.
    pub id: String,
    /// Plain text of the section heading.
    pub title: String,
    /// Raw markdown below the heading.
    pub content: String,
}

/// A document ready for export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    /// Source file name, extension included.
    pub file_name: String,
    pub sections: Vec<Section>,
}

/// Split markdown into sections at level-1 headings.
///
/// See [`split_sections_with`]; the preamble is titled
/// [`DEFAULT_OVERVIEW_TITLE`].
#[must_use]
pub fn split_sections(markdown: &str, fallback_title: &str) -> Vec<Section> {
    split_sections_with(markdown, fallback_title, DEFAULT_OVERVIEW_TITLE)
}

/// Split markdown into sections at level-1 headings.
///
/// Non-blank text before the first heading becomes a section titled
/// `overview_title`. A document without level-1 headings becomes a single
/// section titled `fallback_title`. A blank document has no sections.
#[must_use]
pub fn split_sections_with(
    markdown: &str,
    fallback_title: &str,
    overview_title: &str,
) -> Vec<Section> {
    let headings = find_headings(markdown);

    let mut raw = Vec::with_capacity(headings.len() + 1);
    let preamble_end = headings.first().map_or(markdown.len(), |h| h.start);
    let preamble = &markdown[..preamble_end];
    if !preamble.trim().is_empty() {
        let title = if headings.is_empty() {
            fallback_title
        } else {
            overview_title
        };
        raw.push((title.to_owned(), body(preamble)));
    }

    for (index, heading) in headings.iter().enumerate() {
        let end = headings.get(index + 1).map_or(markdown.len(), |h| h.start);
        raw.push((heading.title.clone(), body(&markdown[heading.end..end])));
    }

    let mut ids = UniqueIds::new();
    raw.into_iter()
        .enumerate()
        .map(|(index, (title, content))| {
            let slug = slugify(&title);
            let base = if slug.is_empty() {
                format!("section-{}", index + 1)
            } else {
                slug
            };
            Section {
                id: ids.unique(base),
                title,
                content,
            }
        })
        .collect()
}

struct Heading {
    /// Byte offset where the heading starts.
    start: usize,
    /// Byte offset right after the heading (underline included for setext).
    end: usize,
    title: String,
}

fn find_headings(markdown: &str) -> Vec<Heading> {
    let parser = MarkdownRenderer::<HtmlBackend>::new().create_parser(markdown);

    let mut headings = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<Heading> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if depth == 0 => {
                current = Some(Heading {
                    start: range.start,
                    end: range.end,
                    title: String::new(),
                });
                depth += 1;
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if depth == 1 && current.is_some() => {
                depth -= 1;
                if let Some(mut heading) = current.take() {
                    heading.title = heading.title.trim().to_owned();
                    headings.push(heading);
                }
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.title.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = current.as_mut() {
                    heading.title.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

/// Section body without surrounding blank lines.
fn body(text: &str) -> String {
    text.trim_start_matches(['\n', '\r']).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_split_at_level_one_headings() {
        let sections = split_sections("# Intro\nHello\n\n# Usage\n\n## Details\nRun it.\n", "doc");
        assert_eq!(titles(&sections), vec!["Intro", "Usage"]);
        assert_eq!(sections[0].id, "intro");
        assert_eq!(sections[0].content, "Hello");
        assert_eq!(sections[1].content, "## Details\nRun it.");
    }

    #[test]
    fn test_preamble_becomes_overview() {
        let sections = split_sections("Some intro.\n\n# First\nBody", "doc");
        assert_eq!(titles(&sections), vec!["Overview", "First"]);
        assert_eq!(sections[0].id, "overview");
        assert_eq!(sections[0].content, "Some intro.");
    }

    #[test]
    fn test_blank_preamble_skipped() {
        let sections = split_sections("\n\n# First\nBody", "doc");
        assert_eq!(titles(&sections), vec!["First"]);
    }

    #[test]
    fn test_custom_overview_title() {
        let sections = split_sections_with("Intro\n\n# First", "doc", "Start here");
        assert_eq!(titles(&sections), vec!["Start here", "First"]);
        assert_eq!(sections[0].id, "start-here");
    }

    #[test]
    fn test_no_headings_uses_fallback_title() {
        let sections = split_sections("Just text.\n\n## Sub\nMore.", "notes");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "notes");
        assert_eq!(sections[0].content, "Just text.\n\n## Sub\nMore.");
    }

    #[test]
    fn test_blank_document_has_no_sections() {
        assert!(split_sections("  \n\n", "doc").is_empty());
    }

    #[test]
    fn test_setext_heading() {
        let sections = split_sections("Title\n=====\nBody text", "doc");
        assert_eq!(titles(&sections), vec!["Title"]);
        assert_eq!(sections[0].content, "Body text");
    }

    #[test]
    fn test_heading_in_code_block_does_not_split() {
        let markdown = "# Real\n```sh\n# comment\n```\n";
        let sections = split_sections(markdown, "doc");
        assert_eq!(titles(&sections), vec!["Real"]);
        assert!(sections[0].content.contains("# comment"));
    }

    #[test]
    fn test_heading_in_blockquote_does_not_split() {
        let sections = split_sections("# Real\n> # Quoted\n", "doc");
        assert_eq!(titles(&sections), vec!["Real"]);
        assert_eq!(sections[0].content, "> # Quoted");
    }

    #[test]
    fn test_heading_title_with_inline_markup() {
        let sections = split_sections("# Install `npm` **now**\nx", "doc");
        assert_eq!(sections[0].title, "Install npm now");
        assert_eq!(sections[0].id, "install-npm-now");
    }

    #[test]
    fn test_duplicate_and_empty_ids() {
        let sections = split_sections("# FAQ\na\n# FAQ\nb\n# ???\nc", "doc");
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["faq", "faq-1", "section-3"]);
    }

    #[test]
    fn test_alert_content_kept_raw() {
        let sections = split_sections("# Ops\n> [!WARNING]\n> Disk usage above 90%.", "doc");
        assert_eq!(sections[0].content, "> [!WARNING]\n> Disk usage above 90%.");
    }
}
