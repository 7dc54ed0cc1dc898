//! Transition table rows.

use crate::core::{Event, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side effect run when a row fires.
///
/// Receives the machine's handler context and the exit reasons that selected
/// the row. Plain function pointers keep rows `Copy` and let tables live in
/// `const`/`static` items.
pub type TransitionAction<C> = fn(&mut C, &Event, u32);

/// Whether a row's `reason2` takes part in matching.
///
/// Rows always carry `reason2`, but by default the search does not compare it
/// against the event's secondary data. Integrations that put per-instance
/// information in the secondary data (a button index, say) rely on that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryDataMatch {
    /// Match on `(from, reason1, reason3)` only.
    #[default]
    Ignore,
    /// Also require `reason2 == event.data`.
    Compare,
}

/// One row of a transition table.
///
/// While the machine is in `from`, the row fires when the finishing state's
/// exit reasons equal `reason1` (event id) and `reason3` (extra), plus
/// `reason2` (event data) under [`SecondaryDataMatch::Compare`]. `to: None`
/// halts the machine.
///
/// # Example
///
/// ```rust
/// use cwsw::engine::Transition;
/// use cwsw::state_enum;
///
/// state_enum! {
///     enum Light { Red, Green }
/// }
///
/// struct Lamp {
///     switches: u32,
/// }
///
/// fn count_switch(lamp: &mut Lamp, _event: &cwsw::core::Event, _extra: u32) {
///     lamp.switches += 1;
/// }
///
/// const TABLE: [Transition<Light, Lamp>; 2] = [
///     Transition::row(Light::Red, 1, 0, 0, Some(Light::Green), Some(count_switch)),
///     Transition::new(Light::Green, 1, 0, Light::Red),
/// ];
/// assert_eq!(TABLE.len(), 2);
/// ```
pub struct Transition<S, C> {
    pub from: S,
    pub reason1: u32,
    pub reason2: u32,
    pub reason3: u32,
    pub to: Option<S>,
    pub action: Option<TransitionAction<C>>,
}

impl<S: State, C> Transition<S, C> {
    /// Fully specified row.
    pub const fn row(
        from: S,
        reason1: u32,
        reason2: u32,
        reason3: u32,
        to: Option<S>,
        action: Option<TransitionAction<C>>,
    ) -> Self {
        Self {
            from,
            reason1,
            reason2,
            reason3,
            to,
            action,
        }
    }

    /// Row moving `from` to `to` on `(reason1, reason3)`, with no action.
    pub const fn new(from: S, reason1: u32, reason3: u32, to: S) -> Self {
        Self::row(from, reason1, 0, reason3, Some(to), None)
    }

    /// Row halting the machine on `(reason1, reason3)`.
    pub const fn halt(from: S, reason1: u32, reason3: u32) -> Self {
        Self::row(from, reason1, 0, reason3, None, None)
    }

    /// Attach a transition action.
    pub fn with_action(mut self, action: TransitionAction<C>) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the secondary-data reason.
    pub fn with_data(mut self, reason2: u32) -> Self {
        self.reason2 = reason2;
        self
    }

    /// Whether this row fires for the given state and exit reasons.
    pub fn matches(
        &self,
        current: S,
        event: &Event,
        extra: u32,
        secondary: SecondaryDataMatch,
    ) -> bool {
        self.from == current
            && self.reason1 == event.id
            && self.reason3 == extra
            && match secondary {
                SecondaryDataMatch::Ignore => true,
                SecondaryDataMatch::Compare => self.reason2 == event.data,
            }
    }

    /// Whether `self` and `other` can fire under exactly the same conditions.
    pub fn same_key(&self, other: &Self, secondary: SecondaryDataMatch) -> bool {
        self.from == other.from
            && self.reason1 == other.reason1
            && self.reason3 == other.reason3
            && (secondary == SecondaryDataMatch::Ignore || self.reason2 == other.reason2)
    }
}

impl<S: Clone, C> Clone for Transition<S, C> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            reason1: self.reason1,
            reason2: self.reason2,
            reason3: self.reason3,
            to: self.to.clone(),
            action: self.action,
        }
    }
}

impl<S: Copy, C> Copy for Transition<S, C> {}

impl<S: fmt::Debug, C> fmt::Debug for Transition<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("reason1", &self.reason1)
            .field("reason2", &self.reason2)
            .field("reason3", &self.reason3)
            .field("to", &self.to)
            .field("action", &self.action.is_some())
            .finish()
    }
}
