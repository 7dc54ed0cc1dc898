//! Build errors for transition rows and machines.

use crate::validation::TableViolation;
use thiserror::Error;

/// Errors that can occur when building transition rows and machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Handler context not specified. Call .handlers(ctx) before .build()")]
    MissingHandlers,

    #[error("No transitions defined. Call .rows(table) with at least one row")]
    NoTransitions,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(event_id)")]
    MissingEvent,

    #[error("Transition target not specified. Call .to(state) or .halt()")]
    MissingTarget,

    #[error("Transition table failed validation with {} violation(s)", .0.len())]
    InvalidTable(Vec<TableViolation>),
}
