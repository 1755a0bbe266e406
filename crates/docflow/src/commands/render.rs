//! `docflow render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use docflow_config::{CliSettings, Config, RenderConfig, Theme};
use docflow_renderer::{
    HtmlBackend, MarkdownRenderer, RenderResult, ThemedBackend, wrap_markdown_body,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit semantic HTML without theme classes.
    #[arg(long)]
    plain: bool,

    /// Path to configuration file (default: auto-discover docflow.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, reading or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            theme: self.plain.then_some(Theme::Plain),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = std::fs::read_to_string(&self.file)?;
        let (html, result) = render_fragment(&markdown, &config.render);
        tracing::info!(
            file = %self.file.display(),
            alerts = result.alerts,
            headings = result.toc.len(),
            "Rendered markdown"
        );

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.status(
                    "Rendered",
                    &format!(
                        "{} -> {} ({} alerts)",
                        self.file.display(),
                        path.display(),
                        result.alerts
                    ),
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }

        Ok(())
    }
}

/// Render markdown with the configured theme.
///
/// Themed output is wrapped in the `markdown-body` container.
fn render_fragment(markdown: &str, config: &RenderConfig) -> (String, RenderResult) {
    match config.theme {
        Theme::Dark => {
            let result = MarkdownRenderer::<ThemedBackend>::new()
                .with_gfm(config.gfm)
                .render_markdown(markdown);
            (wrap_markdown_body(&result.html), result)
        }
        Theme::Plain => {
            let result = MarkdownRenderer::<HtmlBackend>::new()
                .with_gfm(config.gfm)
                .render_markdown(markdown);
            (result.html.clone(), result)
        }
    }
}
