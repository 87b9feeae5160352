//! File system storage management
//!
//! Directory lifecycle and the storage-location collaborator.

pub mod directory;
pub mod location;
pub mod results;

pub use directory::{DirectoryManager, is_directory, is_file};
pub use location::{ConfiguredLocation, StorageLocation};
pub use results::DeleteState;
