use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::derive_filename;
use crate::config::StoreConfig;
use crate::error::{StorageError, StoreError};
use crate::serialize::{Persist, Serializer};
use crate::storage::{ConfiguredLocation, DirectoryManager, StorageLocation};
use crate::transfer::FileIo;
use crate::utils::logging::{DiagnosticSink, LogSink};

/// One configuration wired into every component
pub struct FileStore {
    config: Arc<StoreConfig>,
    location: Arc<dyn StorageLocation>,
    dirs: Arc<DirectoryManager>,
    files: Arc<FileIo>,
    serializer: Serializer,
}

impl FileStore {
    /// Store rooted at the configured base directory, reporting to the `log` facade
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let location = Arc::new(ConfiguredLocation::from_config(&config));
        Self::with_parts(config, location, Arc::new(LogSink))
    }

    /// Store built from `local-store.toml` and `LOCAL_STORE_*` variables
    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(StoreConfig::load()?)
    }

    pub fn with_parts(
        config: StoreConfig,
        location: Arc<dyn StorageLocation>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, StoreError> {
        config.validate()?;
        let config = Arc::new(config);

        let dirs = Arc::new(DirectoryManager::new(config.log_tag.clone(), Arc::clone(&sink)));
        let files = Arc::new(FileIo::new(&config, Arc::clone(&dirs), Arc::clone(&sink)));
        let serializer = Serializer::new(config.log_tag.clone(), Arc::clone(&files), sink);

        let base_dir = location.base_dir();
        if dirs.ensure_directory(&base_dir) {
            info!("Store base directory: {}", base_dir.display());
        } else {
            warn!("Failed to create store base directory {}", base_dir.display());
        }

        Ok(Self {
            config,
            location,
            dirs,
            files,
            serializer,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn directories(&self) -> &DirectoryManager {
        &self.dirs
    }

    pub fn files(&self) -> &FileIo {
        &self.files
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn base_dir(&self) -> PathBuf {
        self.location.base_dir()
    }

    /// Where the entry for `key` lives, e.g. `cache_path(download_url, ".apk")`
    pub fn cache_path(&self, key: &str, extension: &str) -> PathBuf {
        self.base_dir().join(derive_filename(key, extension))
    }

    /// Persist `value` as the cache entry for `key`
    pub fn store_entry<T: Persist>(
        &self,
        key: &str,
        extension: &str,
        value: &T,
    ) -> Result<PathBuf, StoreError> {
        let path = self.cache_path(key, extension);
        self.serializer.write_to_file(&path, value)?;
        Ok(path)
    }

    /// Load the cache entry for `key`. Missing and unreadable blobs are both a miss.
    pub fn load_entry<T: Persist>(
        &self,
        key: &str,
        extension: &str,
    ) -> Result<Option<T>, StoreError> {
        let path = self.cache_path(key, extension);
        self.serializer
            .read_from_file(&path)
            .map_err(StoreError::from)
    }

    /// Delete the cache entry for `key`; true if it is gone afterwards
    pub fn remove_entry(&self, key: &str, extension: &str) -> bool {
        self.dirs.delete_recursive(self.cache_path(key, extension))
    }

    /// Delete every entry but keep the base directory
    pub fn clear(&self) -> bool {
        self.dirs.delete_all_in_folder(self.base_dir())
    }

    /// Create `path` (and its parents) as an empty file, only when removable storage is available
    pub fn create_on_removable(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        if !self.location.is_removable_storage_available() {
            warn!(
                "Removable storage unavailable, not creating {}",
                path.as_ref().display()
            );
            return None;
        }
        self.dirs.create_file_with_parents(path)
    }

    /// Size of the cache entry for `key`, if it exists
    pub fn entry_size(&self, key: &str, extension: &str) -> Option<u64> {
        crate::transfer::file_size(self.cache_path(key, extension))
    }

    /// Write text under the base directory, creating parents as needed
    pub fn write_text(
        &self,
        relative: &str,
        content: &str,
        append: bool,
    ) -> Result<PathBuf, StorageError> {
        let path = self.base_dir().join(relative);
        self.files.write_text(&path, content, append)?;
        Ok(path)
    }
}
