//! Builder for transition table rows.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::engine::{Transition, TransitionAction};

/// Builder for constructing rows with a fluent API.
///
/// `reason2` and `reason3` default to 0; `from`, the event and the target are
/// required.
pub struct TransitionBuilder<S: State, C> {
    from: Option<S>,
    reason1: Option<u32>,
    reason2: u32,
    reason3: u32,
    target: Option<Option<S>>,
    action: Option<TransitionAction<C>>,
}

impl<S: State, C> TransitionBuilder<S, C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            reason1: None,
            reason2: 0,
            reason3: 0,
            target: None,
            action: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the exit event id, reason 1 (required).
    pub fn on(mut self, event_id: u32) -> Self {
        self.reason1 = Some(event_id);
        self
    }

    /// Set the secondary data, reason 2.
    pub fn data(mut self, data: u32) -> Self {
        self.reason2 = data;
        self
    }

    /// Set the exit `extra`, reason 3.
    pub fn extra(mut self, extra: u32) -> Self {
        self.reason3 = extra;
        self
    }

    /// Set the target state.
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(Some(state));
        self
    }

    /// Make the row halt the machine.
    pub fn halt(mut self) -> Self {
        self.target = Some(None);
        self
    }

    /// Set the transition action (optional).
    pub fn action(mut self, action: TransitionAction<C>) -> Self {
        self.action = Some(action);
        self
    }

    /// Build the row.
    pub fn build(self) -> Result<Transition<S, C>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let reason1 = self.reason1.ok_or(BuildError::MissingEvent)?;
        let to = self.target.ok_or(BuildError::MissingTarget)?;

        Ok(Transition::row(
            from,
            reason1,
            self.reason2,
            self.reason3,
            to,
            self.action,
        ))
    }
}

impl<S: State, C> Default for TransitionBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
