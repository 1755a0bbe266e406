//! Configuration management for DocFlow.
//!
//! Parses `docflow.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [render]
//! gfm = true
//! theme = "dark"
//!
//! [export]
//! sidebar_width = 350
//! min_sidebar_width = 200
//! max_sidebar_width = 800
//! prerender = false
//! overview_title = "Overview"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the render theme.
    pub theme: Option<Theme>,
    /// Override GFM extensions.
    pub gfm: Option<bool>,
    /// Override export prerendering.
    pub prerender: Option<bool>,
    /// Override the initial export sidebar width.
    pub sidebar_width: Option<u32>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docflow.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering configuration.
    pub render: RenderConfig,
    /// Standalone export configuration.
    pub export: ExportConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Output theme of rendered fragments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark documentation theme with utility classes.
    #[default]
    Dark,
    /// Semantic HTML without classes.
    Plain,
}

/// Markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
    pub theme: Theme,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            theme: Theme::Dark,
        }
    }
}

/// Standalone export configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Initial sidebar width in pixels.
    pub sidebar_width: u32,
    /// Lower bound of the draggable sidebar width.
    pub min_sidebar_width: u32,
    /// Upper bound of the draggable sidebar width.
    pub max_sidebar_width: u32,
    /// Render markdown ahead of time instead of in the browser.
    pub prerender: bool,
    /// Title of the section holding text before the first heading.
    pub overview_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sidebar_width: 350,
            min_sidebar_width: 200,
            max_sidebar_width: 800,
            prerender: false,
            overview_title: "Overview".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-blank.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a width field to be greater than zero.
fn require_positive(value: u32, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docflow.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(theme) = settings.theme {
            self.render.theme = theme;
        }
        if let Some(gfm) = settings.gfm {
            self.render.gfm = gfm;
        }
        if let Some(prerender) = settings.prerender {
            self.export.prerender = prerender;
        }
        if let Some(sidebar_width) = settings.sidebar_width {
            self.export.sidebar_width = sidebar_width;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_export()
    }

    /// Validate export configuration.
    fn validate_export(&self) -> Result<(), ConfigError> {
        let export = &self.export;
        require_positive(export.sidebar_width, "export.sidebar_width")?;
        require_positive(export.min_sidebar_width, "export.min_sidebar_width")?;
        require_positive(export.max_sidebar_width, "export.max_sidebar_width")?;

        if export.min_sidebar_width > export.max_sidebar_width {
            return Err(ConfigError::Validation(format!(
                "export.min_sidebar_width ({}) cannot exceed export.max_sidebar_width ({})",
                export.min_sidebar_width, export.max_sidebar_width
            )));
        }
        if !(export.min_sidebar_width..=export.max_sidebar_width).contains(&export.sidebar_width) {
            return Err(ConfigError::Validation(format!(
                "export.sidebar_width ({}) must be between {} and {}",
                export.sidebar_width, export.min_sidebar_width, export.max_sidebar_width
            )));
        }

        require_non_empty(&export.overview_title, "export.overview_title")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.render.gfm);
        assert_eq!(config.render.theme, Theme::Dark);
        assert_eq!(config.export.sidebar_width, 350);
        assert_eq!(config.export.min_sidebar_width, 200);
        assert_eq!(config.export.max_sidebar_width, 800);
        assert!(!config.export.prerender);
        assert_eq!(config.export.overview_title, "Overview");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.render.gfm);
        assert_eq!(config.export.sidebar_width, 350);
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
gfm = false
theme = "plain"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.render.gfm);
        assert_eq!(config.render.theme, Theme::Plain);
    }

    #[test]
    fn test_parse_unknown_theme_fails() {
        let toml = r#"
[render]
theme = "neon"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_parse_export_config() {
        let toml = r#"
[export]
sidebar_width = 300
min_sidebar_width = 150
prerender = true
overview_title = "Introduction"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.export.sidebar_width, 300);
        assert_eq!(config.export.min_sidebar_width, 150);
        assert_eq!(config.export.max_sidebar_width, 800);
        assert!(config.export.prerender);
        assert_eq!(config.export.overview_title, "Introduction");
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let settings = CliSettings {
            theme: Some(Theme::Plain),
            gfm: Some(false),
            prerender: Some(true),
            sidebar_width: Some(500),
        };
        config.apply_cli_settings(&settings);
        assert_eq!(config.render.theme, Theme::Plain);
        assert!(!config.render.gfm);
        assert!(config.export.prerender);
        assert_eq!(config.export.sidebar_width, 500);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render.theme, Theme::Dark);
        assert!(config.render.gfm);
        assert!(!config.export.prerender);
        assert_eq!(config.export.sidebar_width, 350);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[export]\nprerender = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert!(config.export.prerender);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/docflow.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docflow.toml");
        std::fs::write(&path, "[export\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docflow.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            sidebar_width: Some(900),
            ..CliSettings::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/guides");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_sidebar_width_zero() {
        let mut config = Config::default();
        config.export.min_sidebar_width = 0;
        assert_validation_error(&config, &["export.min_sidebar_width", "greater than 0"]);
    }

    #[test]
    fn test_validate_min_exceeds_max() {
        let mut config = Config::default();
        config.export.min_sidebar_width = 900;
        assert_validation_error(&config, &["min_sidebar_width", "max_sidebar_width"]);
    }

    #[test]
    fn test_validate_width_out_of_bounds() {
        let mut config = Config::default();
        config.export.sidebar_width = 100;
        assert_validation_error(&config, &["export.sidebar_width", "between 200 and 800"]);
    }

    #[test]
    fn test_validate_width_at_bounds() {
        let mut config = Config::default();
        config.export.sidebar_width = 200;
        assert!(config.validate().is_ok());
        config.export.sidebar_width = 800;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overview_title_blank() {
        let mut config = Config::default();
        config.export.overview_title = "   ".to_owned();
        assert_validation_error(&config, &["export.overview_title", "empty"]);
    }
}
