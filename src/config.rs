//! Configuration management for the local store
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `LOCAL_STORE_*` environment variables. The loaded value is handed to each
//! component at construction; nothing is kept in process-wide state.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_DIR: &str = "./store";
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
pub const DEFAULT_LINE_TERMINATOR: &str = "\r\n";
pub const DEFAULT_LOG_TAG: &str = "local-store";

const ENV_PREFIX: &str = "LOCAL_STORE";

/// Complete store configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StoreConfig {
    /// Base directory handed out by the storage-location provider
    pub base_dir: String,

    /// Whether removable storage is available
    /// Environment: LOCAL_STORE_REMOVABLE_STORAGE
    pub removable_storage: bool,

    /// Chunk size for streamed writes
    pub buffer_size: usize,

    /// Terminator placed between lines by `read_all_text`
    pub line_terminator: String,

    /// Tag passed to the diagnostic sink
    pub log_tag: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: DEFAULT_BASE_DIR.to_string(),
            removable_storage: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            line_terminator: DEFAULT_LINE_TERMINATOR.to_string(),
            log_tag: DEFAULT_LOG_TAG.to_string(),
        }
    }
}

impl StoreConfig {
    /// Load from `./local-store.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name("local-store").required(false))
    }

    /// Load from an explicit TOML file with environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path.to_path_buf()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("base_dir", DEFAULT_BASE_DIR)?
            .set_default("removable_storage", false)?
            .set_default("buffer_size", DEFAULT_BUFFER_SIZE as i64)?
            .set_default("line_terminator", DEFAULT_LINE_TERMINATOR)?
            .set_default("log_tag", DEFAULT_LOG_TAG)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: StoreConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Base directory as a path
    pub fn base_path(&self) -> PathBuf {
        PathBuf::from(&self.base_dir)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_dir.is_empty() {
            return Err(ConfigError::Message("base_dir cannot be empty".into()));
        }

        if self.buffer_size == 0 {
            return Err(ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            ));
        }

        if self.line_terminator != "\n" && self.line_terminator != "\r\n" {
            return Err(ConfigError::Message(format!(
                "line_terminator must be \\n or \\r\\n, got {:?}",
                self.line_terminator
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_is_valid() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_size, 8192);
        assert_eq!(config.line_terminator, "\r\n");
    }

    #[test]
    fn test_load_from_toml_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        fs::write(&path, "base_dir = \"/var/cache/app\"\nbuffer_size = 1024\n").unwrap();

        let config = StoreConfig::load_from(&path).unwrap();
        assert_eq!(config.base_dir, "/var/cache/app");
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.log_tag, DEFAULT_LOG_TAG);
        assert!(!config.removable_storage);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        fs::write(&path, "buffer_size = 0\n").unwrap();
        assert!(StoreConfig::load_from(&path).is_err());

        fs::write(&path, "line_terminator = \";\"\n").unwrap();
        assert!(StoreConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StoreConfig::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
