//! Error handling
//!
//! Defines error types and the failure taxonomy for the store.

pub mod handlers;
pub mod types;

pub use handlers::{FailureKind, failure_kind, report_error};
pub use types::*;
