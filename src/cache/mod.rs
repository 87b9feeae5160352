//! Cache key derivation
//!
//! Maps arbitrary cache keys to content-addressable file names.

pub mod key;

pub use key::{derive_filename, string_hash};
