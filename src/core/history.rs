//! Transition history tracking.
//!
//! Records which table row moved a machine from one state to another and
//! when. `record` returns a new history; `push` appends in place and is
//! what a running machine uses.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{vec_deque, VecDeque};
use std::time::Duration;

/// Record of a single fired transition.
///
/// `to` is `None` when the row halts the machine.
///
/// # Example
///
/// ```rust
/// use cwsw::core::StateTransition;
/// use cwsw::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Pump { Idle, Priming }
/// }
///
/// let transition = StateTransition {
///     from: Pump::Idle,
///     to: Some(Pump::Priming),
///     row: 0,
///     tick: 12,
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.halted());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered, `None` if the machine halted
    pub to: Option<S>,
    /// Index of the table row that fired
    pub row: usize,
    /// Dispatch count at which the transition fired
    pub tick: u64,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// Whether this transition halted the machine.
    pub fn halted(&self) -> bool {
        self.to.is_none()
    }
}

/// Ordered history of fired transitions.
///
/// A history may be bounded: once `limit` transitions are held, recording
/// another evicts the oldest. [`recorded`](StateHistory::recorded) keeps
/// counting evicted transitions too.
///
/// # Example
///
/// ```rust
/// use cwsw::core::{StateHistory, StateTransition};
/// use cwsw::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Light { Red, Green, Yellow }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Light::Red,
///         to: Some(Light::Green),
///         row: 0,
///         tick: 1,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Light::Green,
///         to: Some(Light::Yellow),
///         row: 1,
///         tick: 5,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![Some(Light::Red), Some(Light::Green), Some(Light::Yellow)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    recorded: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
            recorded: 0,
        }
    }

    /// Create a history holding at most `limit` transitions.
    ///
    /// A limit of 0 keeps nothing but still counts.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit: Some(limit),
            recorded: 0,
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Record a transition in place, evicting the oldest one when full.
    pub fn push(&mut self, transition: StateTransition<S>) {
        self.recorded += 1;
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            while self.transitions.len() >= limit {
                self.transitions.pop_front();
            }
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` state of the oldest held transition, followed
    /// by the `to` state of each transition. A `None` entry marks a halt.
    pub fn get_path(&self) -> Vec<Option<S>> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(Some(first.from));
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest held transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// How many held transitions came from the given table row.
    pub fn row_count(&self, row: usize) -> usize {
        self.transitions.iter().filter(|t| t.row == row).count()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    /// Held transitions, oldest first.
    pub fn transitions(&self) -> vec_deque::Iter<'_, StateTransition<S>> {
        self.transitions.iter()
    }

    /// Number of held transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Every transition ever recorded, evicted ones included.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
