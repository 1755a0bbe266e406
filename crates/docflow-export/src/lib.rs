//! Standalone HTML export for DocFlow documents.
//!
//! A markdown file is split into sections at level-1 headings and written as
//! one self-contained page with sidebar navigation. Alerts are rendered in the
//! browser by re-applying the `docflow-renderer` alert rule, or ahead of time
//! with [`ExportOptions::prerender`].

mod exporter;
mod sections;
mod template;

pub use exporter::{ExportError, ExportSummary, Exporter};
pub use sections::{
    DEFAULT_OVERVIEW_TITLE, ExportDocument, Section, split_sections, split_sections_with,
};
pub use template::{
    BUTTON_ACTIVE_CLASSES, BUTTON_BASE_CLASSES, BUTTON_INACTIVE_CLASSES, ExportOptions,
    display_name, render_standalone,
};
