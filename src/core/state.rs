//! State identity, status codes and the event record.
//!
//! A state machine's states are plain values (usually a fieldless enum).
//! Transition tables refer to states by these values, and the engine matches
//! rows by comparing them for equality.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine state identifiers.
///
/// # Required Traits
///
/// - `Copy` + `Eq`: states are compared by value when the engine searches a
///   transition table, and are stored by value in table rows
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states must be serializable for checkpoints
///
/// # Example
///
/// ```rust
/// use cwsw::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
/// enum Light {
///     Red,
///     Green,
///     Yellow,
/// }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Red => "Red",
///             Self::Green => "Green",
///             Self::Yellow => "Yellow",
///         }
///     }
/// }
///
/// assert_eq!(Light::Green.name(), "Green");
/// ```
pub trait State:
    Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Status returned by a state handler to the engine.
///
/// Each state has an internal lifetime: an entry action, a long operational
/// phase, an exit action, and finally relinquishing "current state" status.
/// The ordering of the variants is significant: the engine only searches for
/// a transition when the status is strictly greater than [`ExitPending`].
///
/// [`ExitPending`]: StatusCode::ExitPending
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub enum StatusCode {
    /// Entry step has not run yet. A handler returning this is misbehaving,
    /// but the engine treats it as "stay".
    #[default]
    Uninitialized,
    /// Normal operation; the expected return value most of the time.
    Operational,
    /// The state runs its exit action on the next invocation.
    ExitPending,
    /// The exit action has run and the state gives up "current state" status.
    Finished,
}

impl StatusCode {
    /// Whether this status asks the engine to search for a transition.
    pub fn is_finished(self) -> bool {
        self > StatusCode::ExitPending
    }
}

/// Event delivered to the engine and handed to the current state.
///
/// A finishing state overwrites `id` and `data` with its exit reasons; the
/// third exit reason travels in the separate `extra` value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier; exit reason 1.
    pub id: u32,
    /// Secondary data; exit reason 2.
    pub data: u32,
}

impl Event {
    /// Create an event with the given identifier and no secondary data.
    pub const fn new(id: u32) -> Self {
        Self { id, data: 0 }
    }

    /// Create an event carrying secondary data.
    pub const fn with_data(id: u32, data: u32) -> Self {
        Self { id, data }
    }
}
