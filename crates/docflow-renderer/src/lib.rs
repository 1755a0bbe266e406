//! Markdown renderer with GitHub-style alert callouts.
//!
//! This crate provides a generic [`MarkdownRenderer`] that produces HTML
//! through the [`RenderBackend`] trait, and an [`AlertRewriter`] that turns
//! blockquotes opening with `[!NOTE]`, `[!TIP]`, `[!IMPORTANT]`, `[!WARNING]`
//! or `[!CAUTION]` into titled, icon-prefixed alerts.
//!
//! # Architecture
//!
//! - [`AlertRewriter`]: event stream adapter marking tagged blockquotes with
//!   their [`AlertKind`] and stripping the tag text
//! - [`HtmlBackend`]: semantic HTML5 with `alert alert-{kind}` containers
//! - [`ThemedBackend`]: dark documentation theme built from Tailwind classes
//!
//! Shared functionality (tables, lists, inline formatting, heading ids) is
//! handled by the generic renderer, while element styling is delegated to
//! the backend.
//!
//! # Example
//!
//! ```
//! use docflow_renderer::{HtmlBackend, MarkdownRenderer};
//!
//! let result = MarkdownRenderer::<HtmlBackend>::new()
//!     .render_markdown("> [!WARNING]\n> Disk usage above 90%.");
//! assert_eq!(result.alerts, 1);
//! assert!(result.html.contains(r#"data-alert-type="WARNING""#));
//! ```

mod alert;
mod backend;
mod html;
mod renderer;
mod state;
mod theme;
mod util;

pub use alert::{
    ALERT_STYLES, AlertKind, AlertRewriter, AlertStyle, Classified, TAG_PATTERN_SOURCE,
    classify_and_strip, rewrite_alerts,
};
pub use backend::RenderBackend;
pub use html::HtmlBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, UniqueIds, escape_html, slugify};
pub use theme::{
    ALERT_BODY_CLASSES, ALERT_CONTAINER_CLASSES, ALERT_ICON_SIZE, ALERT_TITLE_CLASSES,
    MARKDOWN_BODY_CSS, ThemedBackend, wrap_markdown_body,
};
