//! Logging utilities
//!
//! Provides logging setup and the sink components report failures to.

use log::error;
use std::error::Error;

/// Setup logging (env_logger picks up the RUST_LOG environment variable).
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging() {
    let _ = env_logger::builder().format_timestamp_millis().try_init();
}

/// Receives failure reports from the store components
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, tag: &str, message: &str, cause: Option<&dyn Error>);
}

/// Forwards reports to the `log` facade, using the tag as log target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, tag: &str, message: &str, cause: Option<&dyn Error>) {
        match cause {
            Some(cause) => error!(target: tag, "{message}: {cause}"),
            None => error!(target: tag, "{message}"),
        }
    }
}
