//! CWSW: building blocks for small firmware projects.
//!
//! Two pieces with real invariants live here:
//!
//! - **State Machine Engine** ([`engine`]): runs the current state's handler
//!   once per tick and, when the state finishes, looks up the next state in
//!   a transition table keyed on the state's exit reasons.
//! - **Critical section** ([`critical`]): a nesting counter that engages
//!   protection on the outermost entry and releases it on the matching
//!   outermost exit.
//!
//! Around them: state identity and handler traits ([`core`]), builders and
//! table validation, checkpoints, and pluggable assertion reporting.
//!
//! # Example
//!
//! ```rust
//! use cwsw::core::{Event, Handlers, StatusCode};
//! use cwsw::engine::{sme, Transition};
//! use cwsw::state_enum;
//!
//! state_enum! {
//!     enum Light {
//!         Red,
//!         Green,
//!     }
//! }
//!
//! const EV_TIMEOUT: u32 = 1;
//!
//! struct Lamp;
//!
//! impl Handlers<Light> for Lamp {
//!     fn step(&mut self, _state: Light, event: &mut Event, extra: &mut u32) -> StatusCode {
//!         event.id = EV_TIMEOUT;
//!         *extra = 0;
//!         StatusCode::Finished
//!     }
//! }
//!
//! let table = [
//!     Transition::new(Light::Red, EV_TIMEOUT, 0, Light::Green),
//!     Transition::new(Light::Green, EV_TIMEOUT, 0, Light::Red),
//! ];
//!
//! let mut current = Some(Light::Red);
//! current = sme(&table, &mut Lamp, current, Event::new(0), 0);
//! assert_eq!(current, Some(Light::Green));
//! ```

pub mod assertion;
pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod critical;
pub mod engine;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{Event, Handlers, State, StateHandler, StatusCode};
pub use critical::CriticalSection;
pub use engine::{find_next_state, sme, Machine, Transition, TransitionTable};
