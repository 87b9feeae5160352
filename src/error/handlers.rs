//! Error handlers
//!
//! Maps errors onto the failure taxonomy and forwards them to a diagnostic sink.

use std::io::ErrorKind;

use crate::error::types::{SerializeError, StorageError, StoreError};
use crate::utils::logging::DiagnosticSink;

/// How a caller is expected to treat a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing data; a normal case for reads and queries
    NotFound,
    /// Underlying read/write/close failed
    IoFailure,
    /// A recursive delete stopped part-way
    PartialFailure,
    /// A blob could not be decoded; treat as a cache miss
    CorruptData,
}

/// Classify an error
pub fn failure_kind(err: &StoreError) -> FailureKind {
    match err {
        StoreError::Storage(StorageError::Io(_, e)) if e.kind() == ErrorKind::NotFound => {
            FailureKind::NotFound
        }
        StoreError::Storage(_) => FailureKind::IoFailure,
        StoreError::Serialize(SerializeError::Encode(_)) => FailureKind::IoFailure,
        StoreError::Serialize(_) => FailureKind::CorruptData,
        StoreError::Config(_) => FailureKind::IoFailure,
    }
}

/// Send an error to the sink under the given tag
pub fn report_error(sink: &dyn DiagnosticSink, tag: &str, context: &str, err: &StoreError) {
    let message = format!("{} ({:?})", context, failure_kind(err));
    sink.report(tag, &message, Some(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_failure_kind_mapping() {
        let missing = StoreError::from(StorageError::io(
            "/nope",
            io::Error::new(ErrorKind::NotFound, "gone"),
        ));
        assert_eq!(failure_kind(&missing), FailureKind::NotFound);

        let denied = StoreError::from(StorageError::io(
            "/root",
            io::Error::new(ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(failure_kind(&denied), FailureKind::IoFailure);

        let corrupt = StoreError::from(SerializeError::BadMagic);
        assert_eq!(failure_kind(&corrupt), FailureKind::CorruptData);
    }
}
