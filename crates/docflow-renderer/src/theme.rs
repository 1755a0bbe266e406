//! Dark documentation theme.
//!
//! Maps markdown elements to Tailwind utility classes. The first-level heading
//! is hidden because the viewer shows the section title separately.

use std::fmt::Write;

use crate::alert::AlertKind;
use crate::backend::RenderBackend;
use crate::state::escape_html;

/// Layout classes of an alert container; the kind's colors are appended.
pub const ALERT_CONTAINER_CLASSES: &str = "border-l-4 rounded-r p-4 my-6 text-sm";

/// Classes of the alert title row (icon + title).
pub const ALERT_TITLE_CLASSES: &str = "flex items-center gap-2 mb-2 font-bold opacity-90";

/// Classes of the alert body wrapping the blockquote's remaining children.
pub const ALERT_BODY_CLASSES: &str = "opacity-90 [&>p]:mb-0 [&>p:first-child]:mt-0";

/// Icon size of alert titles, in pixels.
pub const ALERT_ICON_SIZE: u32 = 18;

/// Styles for nested list guide lines and table cell spacing.
pub const MARKDOWN_BODY_CSS: &str = "
.markdown-body ul, .markdown-body ol { margin-left: 0.5rem; padding-left: 1.5rem; }
.markdown-body li > ul, .markdown-body li > ol { border-left: 1px solid #334155; padding-left: 3rem; margin-left: -1.25rem; margin-top: 0.5rem; margin-bottom: 0.5rem; }
.markdown-body td br { display: block; margin-top: 3rem !important; content: \" \" !important; line-height: 0; }
";

const CODE_FRAME_CLASSES: &str = "relative group my-6";
const PRE_CLASSES: &str = "bg-[#0d1117] text-slate-200 p-5 rounded-xl overflow-x-auto text-sm leading-relaxed border border-slate-800 shadow-2xl";
const TABLE_FRAME_CLASSES: &str = "overflow-x-auto mb-6 border border-slate-800 rounded-xl shadow-lg";

/// Themed HTML render backend.
pub struct ThemedBackend;

impl RenderBackend for ThemedBackend {
    fn element_class(tag: &str) -> Option<&'static str> {
        let class = match tag {
            "h1" => "hidden",
            "h2" => "text-xl md:text-2xl font-bold text-[#5ABDAC] mt-10 mb-5 pb-2 tracking-tight",
            "h3" => "text-lg md:text-xl font-semibold text-[#4A9E92] mt-8 mb-3",
            "h4" => "text-base md:text-lg font-semibold text-slate-300 mt-6 mb-2",
            "p" => "text-base leading-7 text-slate-300 mb-5",
            "strong" => "font-bold text-[#5ABDAC]",
            "ul" => "list-disc list-outside mb-5 text-slate-300 space-y-1.5 text-base marker:text-slate-500",
            "ol" => "list-decimal list-outside mb-5 text-slate-300 space-y-1.5 text-base marker:text-slate-500",
            "li" => "pl-2 leading-7",
            "blockquote" => "border-l-2 border-[#5ABDAC] bg-slate-800/50 pl-5 py-3 my-6 rounded-r text-slate-400 text-sm shadow-sm italic",
            "a" => "text-[#5ABDAC] hover:text-[#7CD4C6] underline transition-colors decoration-[#5ABDAC]/30 underline-offset-4",
            "code" => "bg-slate-800 text-[#5ABDAC] rounded px-1.5 py-0.5 text-sm font-mono border border-slate-700",
            "table" => "min-w-full divide-y divide-slate-800",
            "thead" => "bg-slate-900",
            "th" => "px-5 py-3 text-left text-xs font-medium text-slate-400 uppercase tracking-wider",
            "tbody" => "bg-slate-900/50 divide-y divide-slate-800",
            "td" => "px-5 py-3 align-top whitespace-pre-wrap text-sm text-slate-300 leading-6",
            "img" => "max-w-full h-auto rounded-xl shadow-2xl my-6 mx-auto border border-slate-800",
            "hr" => "my-10 border-slate-800",
            _ => return None,
        };
        Some(class)
    }

    fn link_attrs() -> &'static str {
        r#" target="_blank" rel="noopener noreferrer""#
    }

    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        let _ = write!(
            out,
            r#"<div class="{CODE_FRAME_CLASSES}"><pre class="{PRE_CLASSES}">"#
        );
        match lang {
            Some(lang) => {
                let _ = write!(out, r#"<code class="language-{}">"#, escape_html(lang));
            }
            None => out.push_str("<code>"),
        }
        out.push_str(&escape_html(content));
        out.push_str("</code></pre></div>");
    }

    fn alert_start(kind: AlertKind, out: &mut String) {
        let style = kind.style();
        let _ = write!(
            out,
            r#"<div class="{ALERT_CONTAINER_CLASSES} {}" data-alert-type="{}"><div class="{ALERT_TITLE_CLASSES}">{}<span>{}</span></div><div class="{ALERT_BODY_CLASSES}">"#,
            style.classes,
            kind.as_str(),
            style.icon_svg("alert-icon", ALERT_ICON_SIZE),
            style.title
        );
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div></div>");
    }

    fn table_start(out: &mut String) {
        let _ = write!(out, r#"<div class="{TABLE_FRAME_CLASSES}">"#);
        Self::open_tag("table", "", out);
    }

    fn table_end(out: &mut String) {
        out.push_str("</table></div>");
    }
}

/// Wrap a themed fragment in the `markdown-body` container with its styles.
#[must_use]
pub fn wrap_markdown_body(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + MARKDOWN_BODY_CSS.len() + 64);
    out.push_str(r#"<div class="markdown-body w-full"><style>"#);
    out.push_str(MARKDOWN_BODY_CSS);
    out.push_str("</style>");
    out.push_str(html);
    out.push_str("</div>");
    out
}
