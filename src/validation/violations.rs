//! Findings reported by table validation.

use thiserror::Error;

/// Problems found in a transition table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableViolation {
    #[error("Transition table has no rows")]
    EmptyTable,

    #[error("Row {row} can never fire: row {shadowed_by} matches the same exit reasons first")]
    ShadowedRow { row: usize, shadowed_by: usize },

    #[error("State '{state}' is not reachable from the initial state")]
    UnreachableState { state: String },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
