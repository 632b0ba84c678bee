//! Configuration file handling.
//!
//! This module handles loading `.reviewlens.toml` files and merging them
//! with command-line arguments.

use crate::analysis::ReviewFilter;
use crate::cli::{Args, OutputFormat, RenderArgs};
use crate::client::ApiClientConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".reviewlens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis service settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Rendering settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Analysis service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analysis service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Fall back to `/mock-analysis` when `/history` is unavailable.
    #[serde(default = "default_true")]
    pub fallback_to_mock: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            fallback_to_mock: true,
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_seconds: config.timeout_seconds,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    180 // the service itself waits up to 180s on its scraper
}

fn default_true() -> bool {
    true
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format used when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,

    /// Review filter used when `--filter` is not given.
    #[serde(default)]
    pub review_filter: ReviewFilter,

    /// Maximum number of review cards to render.
    #[serde(default = "default_max_reviews")]
    pub max_reviews: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            review_filter: ReviewFilter::default(),
            max_reviews: default_max_reviews(),
        }
    }
}

fn default_max_reviews() -> usize {
    20
}

/// Effective rendering options for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub format: OutputFormat,
    pub review_filter: ReviewFilter,
    pub max_reviews: usize,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.reviewlens.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);

        if path.exists() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only arguments that were actually given override file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if args.no_fallback {
            self.api.fallback_to_mock = false;
        }
    }

    /// Resolve rendering options for a command from its arguments.
    pub fn render_settings(&self, render: &RenderArgs) -> RenderSettings {
        RenderSettings {
            format: render.format.unwrap_or(self.display.format),
            review_filter: render.filter.unwrap_or(self.display.review_filter),
            max_reviews: render.max_reviews.unwrap_or(self.display.max_reviews),
            output: render.output.clone(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Command;
    use std::io::Write;

    fn make_args() -> Args {
        Args {
            api_url: None,
            config: None,
            timeout: None,
            no_fallback: false,
            verbose: false,
            quiet: false,
            command: Command::Health,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 180);
        assert!(config.api.fallback_to_mock);
        assert_eq!(config.display.max_reviews, 20);
        assert_eq!(config.display.review_filter, ReviewFilter::All);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[api]
base_url = "https://sentiment.example.com"
fallback_to_mock = false

[display]
format = "markdown"
review_filter = "bot"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://sentiment.example.com");
        assert_eq!(config.api.timeout_seconds, 180);
        assert!(!config.api.fallback_to_mock);
        assert_eq!(config.display.format, OutputFormat::Markdown);
        assert_eq!(config.display.review_filter, ReviewFilter::Bot);
        assert_eq!(config.display.max_reviews, 20);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        config.merge_with_args(&args);
        assert_eq!(config.api.base_url, "http://localhost:8000");

        args.api_url = Some("http://10.0.0.5:9000".to_string());
        args.timeout = Some(30);
        args.no_fallback = true;
        config.merge_with_args(&args);
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(!config.api.fallback_to_mock);
    }

    #[test]
    fn test_render_settings() {
        let mut config = Config::default();
        config.display.format = OutputFormat::Json;

        let render = RenderArgs {
            filter: Some(ReviewFilter::Negative),
            format: None,
            output: None,
            max_reviews: Some(3),
        };
        let settings = config.render_settings(&render);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.review_filter, ReviewFilter::Negative);
        assert_eq!(settings.max_reviews, 3);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE)).unwrap();
        writeln!(file, "[api]\ntimeout_seconds = 12").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.api.timeout_seconds, 12);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "api = [").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[display]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.display.max_reviews, 20);
    }
}
