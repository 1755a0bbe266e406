//! File-level export: read markdown, split it, write the standalone page.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::sections::{DEFAULT_OVERVIEW_TITLE, ExportDocument, split_sections_with};
use crate::template::{ExportOptions, display_name, render_standalone};

/// Error returned by the exporter.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Document has no content: {}", .0.display())]
    EmptyDocument(PathBuf),
    #[error("Failed to serialize page data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a successful export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of sections written.
    pub sections: usize,
    /// Size of the written document in bytes.
    pub bytes: usize,
}

/// Writes markdown files as standalone HTML documents.
pub struct Exporter {
    options: ExportOptions,
    overview_title: String,
}

impl Exporter {
    /// Create a new exporter with the given page options.
    #[must_use]
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            overview_title: DEFAULT_OVERVIEW_TITLE.to_owned(),
        }
    }

    /// Title of the section holding the text before the first heading.
    #[must_use]
    pub fn with_overview_title(mut self, title: impl Into<String>) -> Self {
        self.overview_title = title.into();
        self
    }

    /// Split markdown into the document the page is generated from.
    ///
    /// A document without level-1 headings is titled after `file_name`.
    #[must_use]
    pub fn document(&self, file_name: &str, markdown: &str) -> ExportDocument {
        let fallback = display_name(file_name);
        ExportDocument {
            file_name: file_name.to_owned(),
            sections: split_sections_with(markdown, fallback, &self.overview_title),
        }
    }

    /// Export `input` to `output`, creating missing parent directories.
    pub fn export_file(&self, input: &Path, output: &Path) -> Result<ExportSummary, ExportError> {
        let markdown = fs::read_to_string(input)?;
        let file_name = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());

        let doc = self.document(&file_name, &markdown);
        if doc.sections.is_empty() {
            return Err(ExportError::EmptyDocument(input.to_path_buf()));
        }

        let html = render_standalone(&doc, &self.options)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &html)?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            sections = doc.sections.len(),
            "Exported document"
        );

        Ok(ExportSummary {
            sections: doc.sections.len(),
            bytes: html.len(),
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_fallback_title_from_file_name() {
        let doc = Exporter::default().document("release-notes.md", "Fixed bugs.");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "release-notes");
        assert_eq!(doc.sections[0].id, "release-notes");
    }

    #[test]
    fn test_document_custom_overview_title() {
        let doc = Exporter::default()
            .with_overview_title("Preface")
            .document("book.md", "Intro\n\n# Chapter");
        assert_eq!(doc.sections[0].title, "Preface");
        assert_eq!(doc.sections[1].title, "Chapter");
    }

    #[test]
    fn test_export_file_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("guide.md");
        fs::write(&input, "# Setup\n> [!TIP]\n> Use a venv.\n\n# Usage\nRun.\n").unwrap();
        let output = dir.path().join("out/guide.html");

        let summary = Exporter::default().export_file(&input, &output).unwrap();

        assert_eq!(summary.sections, 2);
        let html = fs::read_to_string(&output).unwrap();
        assert_eq!(html.len(), summary.bytes);
        assert!(html.contains("<title>guide - DocFlow Export</title>"));
        assert!(html.contains(r#"id="section-setup" class="section-content""#));
        assert!(html.contains(r#"id="section-usage" class="section-content hidden""#));
    }

    #[test]
    fn test_export_file_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.md");
        fs::write(&input, "\n   \n").unwrap();

        let err = Exporter::default()
            .export_file(&input, &dir.path().join("empty.html"))
            .unwrap_err();
        assert!(matches!(err, ExportError::EmptyDocument(path) if path == input));
    }

    #[test]
    fn test_export_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = Exporter::default()
            .export_file(&dir.path().join("missing.md"), &dir.path().join("x.html"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
