//! The State Machine Engine (SME).
//!
//! The engine runs the current state's handler once per call and, when the
//! state reports it has finished, searches a transition table for the row
//! matching the state's exit reasons.
//!
//! # Key Concepts
//!
//! - **Transition rows**: `(from, reason1, reason2, reason3, to, action)`,
//!   plain `Copy` data that can live in a `const`
//! - **Dispatch**: [`sme`] and [`find_next_state`] are stateless; the caller
//!   keeps the current state
//! - **Machine**: [`Machine`] is the caller-side shell that keeps the current
//!   state, a history and a dispatch count
//!
//! # Matching
//!
//! A row fires when `from` equals the current state, `reason1` equals the
//! exit event id and `reason3` equals the exit `extra`. `reason2` is carried
//! but ignored unless the table uses [`SecondaryDataMatch::Compare`]. When
//! several rows match, the lowest index wins.

mod machine;
mod table;
mod transition;

pub use machine::{Machine, DEFAULT_HISTORY_LIMIT};
pub use table::{find_next_state, sme, StepResult, TransitionTable};
pub use transition::{SecondaryDataMatch, Transition, TransitionAction};
