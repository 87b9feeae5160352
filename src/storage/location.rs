//! Storage locations
//!
//! Where the store keeps its files is decided by the host, not by the store.

use std::path::PathBuf;

use crate::config::StoreConfig;

/// Supplies the base directory and the removable-storage check
pub trait StorageLocation: Send + Sync {
    fn base_dir(&self) -> PathBuf;

    fn is_removable_storage_available(&self) -> bool;
}

/// Location taken straight from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredLocation {
    base_dir: PathBuf,
    removable: bool,
}

impl ConfiguredLocation {
    pub fn new(base_dir: impl Into<PathBuf>, removable: bool) -> Self {
        Self {
            base_dir: base_dir.into(),
            removable,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.base_path(), config.removable_storage)
    }
}

impl StorageLocation for ConfiguredLocation {
    fn base_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    fn is_removable_storage_available(&self) -> bool {
        self.removable
    }
}
