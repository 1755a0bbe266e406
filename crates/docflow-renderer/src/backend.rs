//! Render backend trait for format-specific rendering.
//!
//! The renderer handles document structure; backends decide how individual
//! elements look. A backend can decorate any opening tag through
//! [`RenderBackend::element_class`], which is how a theme maps markdown
//! components to styled HTML without touching the renderer.

use std::fmt::Write;

use crate::alert::AlertKind;
use crate::state::escape_html;

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide rendering for:
/// - Code blocks (plain `<pre><code>` or framed)
/// - Alerts (titled, icon-prefixed callouts)
/// - Class attributes for every other element
pub trait RenderBackend {
    /// CSS classes for an element, keyed by tag name (`p`, `h2`, `td`, ...).
    ///
    /// Default: no classes.
    fn element_class(_tag: &str) -> Option<&'static str> {
        None
    }

    /// Extra attributes for links (e.g. ` target="_blank"`), with a leading space.
    fn link_attrs() -> &'static str {
        ""
    }

    /// Write an opening tag with pre-rendered attributes and the element class.
    ///
    /// # Arguments
    ///
    /// * `tag` - Element name
    /// * `attrs` - Escaped attributes, each prefixed with a space
    /// * `out` - Output buffer to write to
    fn open_tag(tag: &str, attrs: &str, out: &mut String) {
        match Self::element_class(tag) {
            Some(class) => {
                let _ = write!(out, r#"<{tag}{attrs} class="{class}">"#);
            }
            None => {
                let _ = write!(out, "<{tag}{attrs}>");
            }
        }
    }

    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render the opening of an alert container.
    fn alert_start(kind: AlertKind, out: &mut String);

    /// Render the closing of an alert container.
    fn alert_end(kind: AlertKind, out: &mut String);

    /// Render plain blockquote start tag.
    fn blockquote_start(out: &mut String) {
        Self::open_tag("blockquote", "", out);
    }

    /// Render plain blockquote end tag.
    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    /// Render an image.
    ///
    /// # Arguments
    ///
    /// * `src` - Image source URL
    /// * `alt` - Alt text for the image
    /// * `title` - Optional title attribute
    /// * `out` - Output buffer to write to
    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let mut attrs = format!(r#" src="{}""#, escape_html(src));
        if !title.is_empty() {
            let _ = write!(attrs, r#" title="{}""#, escape_html(title));
        }
        let _ = write!(attrs, r#" alt="{}""#, escape_html(alt));
        Self::open_tag("img", &attrs, out);
    }

    /// Render inline code.
    fn inline_code(code: &str, out: &mut String) {
        Self::open_tag("code", "", out);
        out.push_str(&escape_html(code));
        out.push_str("</code>");
    }

    /// Render table start tag.
    fn table_start(out: &mut String) {
        Self::open_tag("table", "", out);
    }

    /// Render table end tag.
    fn table_end(out: &mut String) {
        out.push_str("</table>");
    }

    /// Render a hard break.
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        Self::open_tag("hr", "", out);
    }

    /// Render a task list marker.
    ///
    /// Default uses HTML checkbox. Override for format-specific rendering.
    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}
