//! Local file storage
//!
//! Path helpers, idempotent directory lifecycle, scoped file I/O, versioned
//! object blobs and content-addressable cache file names.

pub mod cache;
pub mod config;
pub mod error;
pub mod path;
pub mod serialize;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod utils;

pub use crate::config::StoreConfig;
pub use error::{FailureKind, SerializeError, StorageError, StoreError};
pub use serialize::{Persist, SerializedBlob};
pub use store::FileStore;
pub use transfer::Charset;
