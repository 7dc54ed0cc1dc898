//! Core state machine types.
//!
//! This module contains the vocabulary shared by the engine and its
//! integrators:
//! - State identity via the `State` trait, plus `StatusCode` and `Event`
//! - The state handler capability and the per-state lifecycle
//! - Immutable transition history

mod handler;
mod history;
mod state;

pub use handler::{Handlers, PhaseActions, Phased, StateHandler};
pub use history::{StateHistory, StateTransition};
pub use state::{Event, State, StatusCode};
