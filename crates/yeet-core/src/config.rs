//! Configuration management for yeet
//!
//! Handles loading of the optional `yeet.toml` file. Every field has a
//! default, so a missing file is the same as an empty one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::LogConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "YEET_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// General configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Bin root directory (`~` is expanded). Defaults to `~/.yeet`.
    #[serde(default)]
    pub root_dir: Option<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown log format: {s}. Expected one of: pretty, json")),
        }
    }
}

/// Where the config file is looked up: `$YEET_CONFIG`, then
/// `<config_dir>/yeet/yeet.toml`.
pub fn resolve_config_path(env_override: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("yeet").join("yeet.toml"))
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> crate::Result<Self> {
        let env_override = std::env::var(CONFIG_ENV).ok();
        match resolve_config_path(env_override.as_deref()) {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ReadFailed(path.display().to_string(), e.to_string())
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::ParseFailed(path.display().to_string(), e.to_string())
        })?;
        Ok(config)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(suffix) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(suffix);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.general.root_dir.is_none());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn load_from_parses_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("yeet.toml");
        std::fs::write(&path, "[general]\nroot_dir = \"/srv/bin\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.general.root_dir.as_deref(), Some("/srv/bin"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn load_from_reads_logging_table() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("yeet.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("yeet.toml");
        std::fs::write(&path, "[general\nroot_dir = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Config(ConfigError::ParseFailed(..))
        ));
    }

    #[test]
    fn resolve_config_path_prefers_override() {
        assert_eq!(
            resolve_config_path(Some("/etc/yeet.toml")),
            Some(PathBuf::from("/etc/yeet.toml"))
        );
    }

    #[test]
    fn log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn log_format_display() {
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde("/srv/bin"), PathBuf::from("/srv/bin"));
    }
}
