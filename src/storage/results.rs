//! Storage result types
//!
//! Defines result structures returned by directory operations.

use std::path::PathBuf;

use crate::error::FailureKind;

/// Progress of a recursive delete.
///
/// Every delete starts `Pending`, passes through `Recursing` when it enters
/// a directory and ends `Deleted` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState {
    Pending,
    Recursing,
    Deleted,
    /// Stopped at `path`; entries removed before it stay removed
    Failed { path: PathBuf },
}

impl DeleteState {
    pub fn succeeded(&self) -> bool {
        matches!(self, DeleteState::Deleted)
    }

    /// Taxonomy entry for a failed delete
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            DeleteState::Failed { .. } => Some(FailureKind::PartialFailure),
            _ => None,
        }
    }
}
