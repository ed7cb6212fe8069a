use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::filter::DEFAULT_RESULT_LIMIT;
use crate::session::{DEFAULT_NOTICE_TIMEOUT_SECS, DEFAULT_PAGE_SIZE};
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Empty means the profile's data directory
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_notice_timeout_secs")]
    pub notice_timeout_secs: u64,
    /// Used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Where `export` writes when no directory is given
    #[serde(default)]
    pub export_dir: Option<String>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            result_limit: default_result_limit(),
            page_size: default_page_size(),
            notice_timeout_secs: default_notice_timeout_secs(),
            log_filter: default_log_filter(),
            export_dir: None,
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

fn default_result_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_notice_timeout_secs() -> u64 {
    DEFAULT_NOTICE_TIMEOUT_SECS
}

fn default_log_filter() -> String {
    "biblioteca=warn".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid setting: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration for a profile, creating the default file if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_or_create(&config_path, profile)
    }

    /// Load configuration from an explicit file, creating it if missing
    pub fn load_from_path(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        Self::load_or_create(path, profile)
    }

    fn load_or_create(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            toml::from_str::<Config>(&contents)?
        } else {
            let mut config = Config::default();
            config.save_to_path(path)?;
            tracing::debug!(path = %path.display(), "wrote default config");
            config
        };

        if config.database_path.trim().is_empty() {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.result_limit == 0 {
            return Err(ConfigError::InvalidValue("result_limit must be at least 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue("page_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("biblioteca.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/biblioteca-dev/biblioteca.db".to_string(),
                utils::Profile::Prod => "~/.local/share/biblioteca/biblioteca.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Export directory, falling back to the current directory
    pub fn get_export_dir(&self) -> PathBuf {
        match self.export_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => utils::expand_path(dir),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::Profile;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from_path(&path, Profile::Dev).unwrap();
        assert!(path.exists());
        assert_eq!(config.result_limit, 500);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.notice_timeout_secs, 3);
        assert!(!config.database_path.is_empty());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("config_version = 1"));
    }

    #[test]
    fn partial_file_uses_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "database_path = \"/tmp/x.db\"\npage_size = 20\n").unwrap();
        let config = Config::load_from_path(&path, Profile::Prod).unwrap();
        assert_eq!(config.database_path, "/tmp/x.db");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.result_limit, DEFAULT_RESULT_LIMIT);
        assert_eq!(config.log_filter, "biblioteca=warn");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = 0\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path, Profile::Prod),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = [").unwrap();
        assert!(matches!(
            Config::load_from_path(&path, Profile::Prod),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn export_dir_defaults_to_cwd() {
        let mut config = Config::default();
        assert_eq!(config.get_export_dir(), PathBuf::from("."));
        config.export_dir = Some("/data/exports".to_string());
        assert_eq!(config.get_export_dir(), PathBuf::from("/data/exports"));
    }
}
