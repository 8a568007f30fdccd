//! Configuration management for web-maker.
//!
//! Parses `wm.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! site_name = "My Site"
//! content_path = "content"
//! template_path = "templates"
//! dist_path = "dist"
//! default_template = "default.html"
//! html_base_url = "${SITE_URL:-http://localhost:8000/}"
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file. CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `html_base_url` supports `${VAR}` (error if unset) and `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "wm.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub dist_dir: Option<PathBuf>,
    /// Override base URL.
    pub base_url: Option<String>,
}

/// Site configuration.
///
/// The string fields hold the values as written in the config file and are
/// what templates see. [`Config::paths`] holds the resolved directories.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Site name.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Content directory.
    pub content_path: String,
    /// Template directory.
    pub template_path: String,
    /// Output directory.
    pub dist_path: String,
    /// Template for pages without a `template` key.
    pub default_template: String,
    /// Base URL for generated links.
    pub html_base_url: String,
    /// Value for `<html lang>`.
    #[serde(default = "default_language")]
    pub html_language: String,
    /// Value for `<meta charset>`.
    #[serde(default = "default_charset")]
    pub html_charset: String,

    /// Resolved project directories (set after loading).
    #[serde(skip)]
    pub paths: ProjectPaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn default_site_name() -> String {
    "website".to_owned()
}

fn default_language() -> String {
    "en-gb".to_owned()
}

fn default_charset() -> String {
    "UTF-8".to_owned()
}

/// Project directories resolved to absolute paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory holding the config file.
    pub root_dir: PathBuf,
    /// Content source directory.
    pub content_dir: PathBuf,
    /// Template directory.
    pub template_dir: PathBuf,
    /// Output directory.
    pub dist_dir: PathBuf,
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field name (e.g., "`html_base_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`}: environment variable not found").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wm.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after path resolution, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no config file exists, or an error
    /// if parsing, expansion, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => {
                let cwd = std::env::current_dir()?;
                Self::discover_config(&cwd)
                    .ok_or_else(|| ConfigError::NotFound(cwd.join(CONFIG_FILENAME)))?
            }
        };

        let mut config = Self::load_from_file(&path)?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dist_dir) = &settings.dist_dir {
            self.dist_path = dist_dir.display().to_string();
            self.paths.dist_dir = self.paths.root_dir.join(dist_dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.html_base_url.clone_from(base_url);
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let absolute = std::path::absolute(path)?;
        config.resolve_paths(absolute.parent().unwrap_or(&absolute));
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.content_path, "content_path")?;
        require_non_empty(&self.template_path, "template_path")?;
        require_non_empty(&self.dist_path, "dist_path")?;
        require_non_empty(&self.default_template, "default_template")?;
        require_non_empty(&self.html_base_url, "html_base_url")?;
        require_http_url(&self.html_base_url, "html_base_url")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.html_base_url = expand::expand_env(&self.html_base_url, "html_base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.paths = ProjectPaths {
            root_dir: config_dir.to_path_buf(),
            content_dir: config_dir.join(&self.content_path),
            template_dir: config_dir.join(&self.template_path),
            dist_dir: config_dir.join(&self.dist_path),
        };
    }

    /// Every configuration value by key, as exposed to templates.
    #[must_use]
    pub fn values(&self) -> [(&'static str, &str); 8] {
        [
            ("site_name", self.site_name.as_str()),
            ("content_path", self.content_path.as_str()),
            ("template_path", self.template_path.as_str()),
            ("dist_path", self.dist_path.as_str()),
            ("default_template", self.default_template.as_str()),
            ("html_base_url", self.html_base_url.as_str()),
            ("html_language", self.html_language.as_str()),
            ("html_charset", self.html_charset.as_str()),
        ]
    }
}
