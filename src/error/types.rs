//! Error types
//!
//! Defines the error types for each component of the store.

use std::fmt;
use std::io;

/// Filesystem-facing errors raised by directory and file operations
#[derive(Debug)]
pub enum StorageError {
    InvalidPath(String),
    NotAFile(String),
    UnsupportedCharset(String),
    Io(String, io::Error),
}

impl StorageError {
    /// Wraps an I/O error together with the path it happened on
    pub fn io(path: impl Into<String>, error: io::Error) -> Self {
        StorageError::Io(path.into(), error)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::NotAFile(p) => write!(f, "Not a regular file: {}", p),
            StorageError::UnsupportedCharset(c) => write!(f, "Unsupported charset: {}", c),
            StorageError::Io(p, e) => write!(f, "IO error on {}: {}", p, e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while encoding or decoding a serialized blob
#[derive(Debug)]
pub enum SerializeError {
    Truncated { needed: usize, available: usize },
    BadMagic,
    UnsupportedFormat(u8),
    TypeMismatch { expected: String, found: String },
    SchemaMismatch { type_tag: String, expected: u16, found: u16 },
    TrailingBytes(usize),
    Encode(bincode::Error),
    Decode(bincode::Error),
    Base64(base64::DecodeError),
    EmptyInput,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::Truncated { needed, available } => write!(
                f,
                "Blob truncated: needed {} bytes, {} available",
                needed, available
            ),
            SerializeError::BadMagic => write!(f, "Blob does not start with the store magic"),
            SerializeError::UnsupportedFormat(v) => {
                write!(f, "Unsupported blob format version: {}", v)
            }
            SerializeError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            SerializeError::SchemaMismatch {
                type_tag,
                expected,
                found,
            } => write!(
                f,
                "Schema version mismatch for {}: expected {}, found {}",
                type_tag, expected, found
            ),
            SerializeError::TrailingBytes(n) => write!(f, "{} unexpected bytes after payload", n),
            SerializeError::Encode(e) => write!(f, "Encoding failed: {}", e),
            SerializeError::Decode(e) => write!(f, "Decoding failed: {}", e),
            SerializeError::Base64(e) => write!(f, "Invalid Base64 text: {}", e),
            SerializeError::EmptyInput => write!(f, "Empty input"),
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Encode(e) | SerializeError::Decode(e) => Some(e.as_ref()),
            SerializeError::Base64(e) => Some(e),
            _ => None,
        }
    }
}

impl From<base64::DecodeError> for SerializeError {
    fn from(error: base64::DecodeError) -> Self {
        SerializeError::Base64(error)
    }
}

/// General store error that encompasses all error types
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialize(SerializeError),
    Config(config::ConfigError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(e) => write!(f, "Storage error: {}", e),
            StoreError::Serialize(e) => write!(f, "Serialization error: {}", e),
            StoreError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(e) => Some(e),
            StoreError::Serialize(e) => Some(e),
            StoreError::Config(e) => Some(e),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(error: StorageError) -> Self {
        StoreError::Storage(error)
    }
}

impl From<SerializeError> for StoreError {
    fn from(error: SerializeError) -> Self {
        StoreError::Serialize(error)
    }
}

impl From<config::ConfigError> for StoreError {
    fn from(error: config::ConfigError) -> Self {
        StoreError::Config(error)
    }
}
