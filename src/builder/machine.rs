//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{Handlers, State};
use crate::engine::{
    Machine, SecondaryDataMatch, Transition, TransitionTable, DEFAULT_HISTORY_LIMIT,
};
use crate::validation::TableRules;
use stillwater::validation::Validation;

/// Builder for constructing machines with a fluent API.
pub struct MachineBuilder<'t, S: State, C> {
    rows: Option<&'t [Transition<S, C>]>,
    handlers: Option<C>,
    initial: Option<S>,
    secondary: SecondaryDataMatch,
    history_limit: usize,
    strict: bool,
}

impl<'t, S: State, C: Handlers<S>> MachineBuilder<'t, S, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            rows: None,
            handlers: None,
            initial: None,
            secondary: SecondaryDataMatch::Ignore,
            history_limit: DEFAULT_HISTORY_LIMIT,
            strict: false,
        }
    }

    /// Set the transition table (required).
    pub fn rows(mut self, rows: &'t [Transition<S, C>]) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set the handler context (required).
    pub fn handlers(mut self, handlers: C) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Compare `reason2` against the event's secondary data.
    pub fn secondary_match(mut self, secondary: SecondaryDataMatch) -> Self {
        self.secondary = secondary;
        self
    }

    /// Keep at most `limit` transitions in the history; 0 disables it.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Reject tables with shadowed rows or unreachable states.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Machine<'t, S, C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let handlers = self.handlers.ok_or(BuildError::MissingHandlers)?;
        let rows = self.rows.ok_or(BuildError::NoTransitions)?;

        if rows.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        if self.strict {
            let rules = TableRules::new()
                .secondary_match(self.secondary)
                .initial(initial);
            if let Validation::Failure(violations) = rules.validate(rows) {
                return Err(BuildError::InvalidTable(violations.iter().cloned().collect()));
            }
        }

        let table = TransitionTable::new(rows).with_secondary_match(self.secondary);
        Ok(Machine::with_history_limit(
            table,
            handlers,
            initial,
            self.history_limit,
        ))
    }
}

impl<'t, S: State, C: Handlers<S>> Default for MachineBuilder<'t, S, C> {
    fn default() -> Self {
        Self::new()
    }
}
