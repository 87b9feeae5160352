//! Store facade
//!
//! Builds every component from one configuration value.

pub mod core;

pub use self::core::FileStore;
