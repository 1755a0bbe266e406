//! HTML backend for markdown rendering.
//!
//! Produces semantic HTML5 output without theme classes.

use std::fmt::Write;

use crate::alert::AlertKind;
use crate::backend::RenderBackend;
use crate::state::escape_html;

/// Icon size of alert titles, in pixels.
const ICON_SIZE: u32 = 16;

/// HTML render backend.
///
/// Alerts become `<div class="alert alert-{slug}">` containers with a title
/// row and an `alert-content` body; everything else is plain semantic HTML.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        let attrs = lang
            .map(|lang| format!(r#" class="language-{}""#, escape_html(lang)))
            .unwrap_or_default();
        out.push_str("<pre>");
        Self::open_tag("code", &attrs, out);
        out.push_str(&escape_html(content));
        out.push_str("</code></pre>");
    }

    fn alert_start(kind: AlertKind, out: &mut String) {
        let style = kind.style();
        let _ = write!(
            out,
            r#"<div class="alert alert-{}" data-alert-type="{}"><div class="alert-title">{}{}</div><div class="alert-content">"#,
            style.slug,
            kind.as_str(),
            style.icon_svg("alert-icon", ICON_SIZE),
            style.title
        );
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div></div>");
    }
}
