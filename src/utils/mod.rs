//! Utility functions
//!
//! Logging setup and the diagnostic sink shared by all components.

pub mod logging;

pub use logging::{DiagnosticSink, LogSink, setup_logging};
