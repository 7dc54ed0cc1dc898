//! Validation of transition tables.
//!
//! Checks accumulate with Stillwater's `Validation`, so one pass reports
//! every problem in a table rather than the first one.
//!
//! Built-in checks:
//! - the table has at least one row
//! - no row is shadowed by an earlier row with the same match key (the
//!   lowest index always wins, so the later row can never fire)
//! - every state is reachable from the initial state, when one is given
//!
//! # Example
//!
//! ```rust
//! use cwsw::engine::Transition;
//! use cwsw::state_enum;
//! use cwsw::validation::TableRules;
//!
//! state_enum! {
//!     enum Light { Red, Green, Yellow }
//! }
//!
//! let rows: [Transition<Light, ()>; 3] = [
//!     Transition::new(Light::Red, 1, 0, Light::Green),
//!     Transition::new(Light::Green, 1, 0, Light::Yellow),
//!     Transition::new(Light::Yellow, 1, 0, Light::Red),
//! ];
//!
//! let rules = TableRules::new().initial(Light::Red);
//! assert!(rules.validate(&rows).is_success());
//! ```

pub mod rules;
pub mod violations;

pub use rules::{validate_table, TableCheck, TableRules};
pub use violations::TableViolation;
