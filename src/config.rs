//! Configuration for the lucene-query CLI.
//!
//! Settings are read from TOML:
//!
//! ```toml
//! [output]
//! format = "json"
//! color = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{QueryError, QueryResult};

/// Project-local config file name.
pub const LOCAL_CONFIG: &str = "lucene-query.toml";

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

/// How canonical queries are printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Colorize terminal output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The query string alone
    #[default]
    Plain,
    /// `{"query": "..."}`
    Json,
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> QueryResult<Self> {
        toml::from_str(content).map_err(|e| QueryError::Config(e.to_string()))
    }

    /// Read configuration from a file.
    pub fn from_file(path: &Path) -> QueryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./lucene-query.toml` and then
    /// the user config directory are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> QueryResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for path in Self::candidates() {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("lucene-query").join("config.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.format, OutputFormat::Plain);
        assert!(config.output.color);
    }

    #[test]
    fn test_output_section() {
        let config = Config::from_toml_str("[output]\nformat = \"json\"\ncolor = false\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
    }

    #[test]
    fn test_partial_output_section() {
        let config = Config::from_toml_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color);
    }

    #[test]
    fn test_invalid_format() {
        let err = Config::from_toml_str("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]").unwrap();
        writeln!(file, "color = false").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.output.color);
        assert_eq!(config.output.format, OutputFormat::Plain);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/lucene-query.toml"))).unwrap_err();
        assert!(matches!(err, QueryError::Io(_)));
    }
}
