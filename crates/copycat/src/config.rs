//! Configuration management for copycat.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::message::LineEnding;
use crate::patterns::{default_patterns, PatternStore};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "copycat";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COPYCAT_`, `__` between sections)
/// 2. TOML config file at `~/.config/copycat/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Header pattern configuration.
    pub patterns: PatternsConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Header pattern configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Seed list. Loaded at start-up and restored by a reset.
    pub defaults: Vec<String>,
    /// Extra patterns excluded on top of the defaults at start-up.
    pub additional: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Terminator used when reassembling filtered messages.
    pub line_ending: LineEnding,
    /// Publish to the system clipboard instead of standard output.
    pub clipboard: bool,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            defaults: default_patterns(),
            additional: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("COPYCAT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// Patterns that are not valid regexes are accepted; they match as
    /// literal header names.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is blank.
    pub fn validate(&self) -> Result<()> {
        let all = self
            .patterns
            .defaults
            .iter()
            .map(|p| ("defaults", p))
            .chain(self.patterns.additional.iter().map(|p| ("additional", p)));

        for (section, pattern) in all {
            if pattern.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("patterns.{section} contains a blank pattern"),
                });
            }
        }

        Ok(())
    }

    /// Build the pattern store described by this configuration.
    #[must_use]
    pub fn pattern_store(&self) -> PatternStore {
        let mut store = PatternStore::with_defaults(self.patterns.defaults.clone());
        for pattern in &self.patterns.additional {
            store.add(pattern.trim());
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.patterns.defaults, default_patterns());
        assert!(config.patterns.additional.is_empty());
        assert_eq!(config.output.line_ending, LineEnding::Crlf);
        assert!(!config.output.clipboard);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_invalid_regex() {
        let mut config = Config::default();
        config.patterns.additional = vec!["x-(".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_blank_pattern() {
        let mut config = Config::default();
        config.patterns.additional = vec!["  ".to_string()];

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("patterns.additional"));
    }

    #[test]
    fn test_pattern_store_includes_additional() {
        let mut config = Config::default();
        config.patterns.additional = vec!["x-.*".to_string(), " host ".to_string()];

        let store = config.pattern_store();
        assert!(store.contains("x-.*"));
        assert_eq!(store.len(), default_patterns().len() + 1);
        assert_eq!(store.defaults().to_vec(), default_patterns());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("copycat"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[patterns]
defaults = ["host", "cookie"]
additional = ["x-.*"]

[output]
line_ending = "lf"
clipboard = true
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.patterns.defaults, vec!["host", "cookie"]);
        assert_eq!(config.patterns.additional, vec!["x-.*"]);
        assert_eq!(config.output.line_ending, LineEnding::Lf);
        assert!(config.output.clipboard);
    }

    #[test]
    fn test_load_rejects_blank_pattern() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[patterns]\nadditional = [\"\"]").unwrap();

        let result = Config::load_from(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("line_ending"));
        assert!(json.contains("\"crlf\""));
    }

    #[test]
    fn test_output_config_deserialize() {
        let json = r#"{"line_ending": "lf"}"#;
        let output: OutputConfig = serde_json::from_str(json).unwrap();
        assert_eq!(output.line_ending, LineEnding::Lf);
        assert!(!output.clipboard);
    }
}
