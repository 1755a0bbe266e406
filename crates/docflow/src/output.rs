//! Status reporting on stderr.
//!
//! Lines look like `    Exported guide.md -> guide.html`: a styled verb
//! right-aligned in a fixed column, then the details. Stdout is left to
//! rendered HTML.

use console::{Style, Term};

/// Column the status verb is right-aligned to.
const VERB_WIDTH: usize = 12;

/// Stderr status reporter.
pub(crate) struct Output {
    term: Term,
    verb: Style,
    failure: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            verb: Style::new().green().bold(),
            failure: Style::new().red().bold(),
        }
    }

    /// Report progress, e.g. `status("Rendering", "guide.md")`.
    pub(crate) fn status(&self, verb: &str, detail: &str) {
        let _ = self.term.write_line(&status_line(&self.verb, verb, detail));
    }

    /// Report a fatal error.
    pub(crate) fn error(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&format!("{}: {msg}", self.failure.apply_to("error")));
    }
}

/// Format one status line with `verb` padded to [`VERB_WIDTH`].
fn status_line(style: &Style, verb: &str, detail: &str) -> String {
    let pad = VERB_WIDTH.saturating_sub(verb.chars().count());
    format!("{}{} {detail}", " ".repeat(pad), style.apply_to(verb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_verb_right_aligned() {
        let plain = Style::new();
        assert_eq!(
            status_line(&plain, "Exported", "3 sections"),
            "    Exported 3 sections"
        );
        assert_eq!(
            status_line(&plain, "Rendered", "a.md -> a.html"),
            "    Rendered a.md -> a.html"
        );
    }

    #[test]
    fn test_long_verb_not_truncated() {
        let line = status_line(&Style::new(), "Prerendering", "guide.md");
        assert_eq!(line, "Prerendering guide.md");
    }
}
