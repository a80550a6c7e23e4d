//! Client configuration
//!
//! Loaded from `<config_dir>/tutorly/config.toml` when present:
//! ```toml
//! api_base_url = "https://lms.example.com"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! default_page_size = 10
//! data_dir = "/home/me/.local/share/tutorly"
//! ```
//! `TUTORLY_API_URL` and `TUTORLY_DATA_DIR` override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_URL_ENV: &str = "TUTORLY_API_URL";
pub const DATA_DIR_ENV: &str = "TUTORLY_DATA_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine a {0} directory")]
    NoDirectory(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Server root; requests go to `{api_base_url}/api/...`
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub default_page_size: u32,
    /// Where local storage lives (tokens, quiz and review state)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            default_page_size: 10,
            data_dir: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("tutorly").join("config.toml"))
            .ok_or(ConfigError::NoDirectory("config"))
    }

    /// Load the default config file (if any), then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load a config file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATA_DIR_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, data_dir: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Data directory, defaulting to the platform data dir
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|d| d.join("tutorly"))
                .ok_or(ConfigError::NoDirectory("data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = \"https://lms.example.com\"\ntimeout_secs = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://lms.example.com");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            default_page_size: 25,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = Config::default();
        config.apply_overrides(Some("  ".into()), Some("/tmp/tutorly".into()));
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tutorly")));
    }
}
