//! `docflow export` command implementation.

use std::path::PathBuf;

use clap::Args;
use docflow_config::{CliSettings, Config};
use docflow_export::{ExportOptions, Exporter};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Output file (default: input file with `.html` extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render markdown ahead of time instead of in the browser.
    #[arg(long)]
    prerender: bool,

    /// Path to configuration file (default: auto-discover docflow.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or the export fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            prerender: self.prerender.then_some(true),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let target = self
            .output
            .unwrap_or_else(|| self.file.with_extension("html"));
        output.status("Exporting", &self.file.display().to_string());

        let exporter = Exporter::new(export_options(&config))
            .with_overview_title(config.export.overview_title.clone());
        let summary = exporter.export_file(&self.file, &target)?;

        output.status(
            "Exported",
            &format!(
                "{} sections to {} ({} bytes)",
                summary.sections,
                target.display(),
                summary.bytes
            ),
        );
        Ok(())
    }
}

/// Page options from the `[export]` section plus the `[render]` GFM switch.
fn export_options(config: &Config) -> ExportOptions {
    let export = &config.export;
    ExportOptions {
        sidebar_width: export.sidebar_width,
        min_sidebar_width: export.min_sidebar_width,
        max_sidebar_width: export.max_sidebar_width,
        prerender: export.prerender,
        gfm: config.render.gfm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflow_config::{ExportConfig, RenderConfig, Theme};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_options_from_config() {
        let config = Config {
            render: RenderConfig {
                gfm: false,
                theme: Theme::Plain,
            },
            export: ExportConfig {
                sidebar_width: 400,
                min_sidebar_width: 250,
                max_sidebar_width: 700,
                prerender: true,
                overview_title: "Intro".to_owned(),
            },
            ..Config::default()
        };
        assert_eq!(
            export_options(&config),
            ExportOptions {
                sidebar_width: 400,
                min_sidebar_width: 250,
                max_sidebar_width: 700,
                prerender: true,
                gfm: false,
            }
        );
    }

    #[test]
    fn test_default_config_matches_default_options() {
        assert_eq!(export_options(&Config::default()), ExportOptions::default());
    }
}
