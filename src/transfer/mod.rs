//! Transfer module for the local store
//!
//! Text, byte and stream I/O against single files.

pub mod charset;
pub mod file_ops;

// Re-export key types and functions
pub use charset::Charset;
pub use file_ops::{FileIo, file_size, open_reader, split_lines};
