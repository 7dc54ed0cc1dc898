//! Transition table search and SME dispatch.

use crate::core::{Event, Handlers, State, StatusCode};
use crate::engine::transition::{SecondaryDataMatch, Transition};
use tracing::trace;

/// What one dispatch did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult<S: State> {
    /// No current state; nothing ran.
    Halted,

    /// The state returned a non-finished status and stays current.
    Remained { state: S, status: StatusCode },

    /// The state finished but no row matched its exit reasons; it stays
    /// current.
    Unmatched { state: S },

    /// Row `row` fired.
    Transitioned { from: S, row: usize, to: Option<S> },
}

impl<S: State> StepResult<S> {
    /// State the caller should store as current.
    pub fn next_state(&self) -> Option<S> {
        match *self {
            StepResult::Halted => None,
            StepResult::Remained { state, .. } | StepResult::Unmatched { state } => Some(state),
            StepResult::Transitioned { to, .. } => to,
        }
    }

    /// Index of the row that fired, if any.
    pub fn fired_row(&self) -> Option<usize> {
        match *self {
            StepResult::Transitioned { row, .. } => Some(row),
            _ => None,
        }
    }
}

/// A borrowed transition table together with its matching policy.
///
/// The rows are immutable configuration owned by the integrator; the table
/// keeps no state between calls.
pub struct TransitionTable<'t, S, C> {
    rows: &'t [Transition<S, C>],
    secondary: SecondaryDataMatch,
}

impl<'t, S: State, C> TransitionTable<'t, S, C> {
    /// Table matching on `(from, reason1, reason3)`.
    pub const fn new(rows: &'t [Transition<S, C>]) -> Self {
        Self {
            rows,
            secondary: SecondaryDataMatch::Ignore,
        }
    }

    /// Change whether `reason2` takes part in matching.
    pub fn with_secondary_match(mut self, secondary: SecondaryDataMatch) -> Self {
        self.secondary = secondary;
        self
    }

    pub fn rows(&self) -> &'t [Transition<S, C>] {
        self.rows
    }

    pub fn secondary_match(&self) -> SecondaryDataMatch {
        self.secondary
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the row that would fire, without running its action.
    ///
    /// When several rows match, the one with the lowest index wins, so table
    /// order encodes priority.
    pub fn lookup(
        &self,
        current: S,
        event: &Event,
        extra: u32,
    ) -> Option<(usize, &'t Transition<S, C>)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.matches(current, event, extra, self.secondary))
    }

    /// Search for the next state and run the selected row's action.
    ///
    /// Returns `Some(current)` when nothing matches. At most one action runs.
    pub fn find_next_state(
        &self,
        handlers: &mut C,
        current: S,
        event: &Event,
        extra: u32,
    ) -> Option<S> {
        match self.fire(handlers, current, event, extra) {
            Some((_, to)) => to,
            None => Some(current),
        }
    }

    /// Run one SME step and report what happened.
    pub fn dispatch(
        &self,
        handlers: &mut C,
        current: Option<S>,
        mut event: Event,
        mut extra: u32,
    ) -> StepResult<S>
    where
        C: Handlers<S>,
    {
        let Some(state) = current else {
            trace!("dispatch skipped, machine halted");
            return StepResult::Halted;
        };

        let status = handlers.step(state, &mut event, &mut extra);
        trace!(state = state.name(), ?status, "state handler returned");

        if !status.is_finished() {
            return StepResult::Remained { state, status };
        }

        match self.fire(handlers, state, &event, extra) {
            Some((row, to)) => StepResult::Transitioned { from: state, row, to },
            None => {
                trace!(
                    state = state.name(),
                    event = event.id,
                    extra,
                    "no transition for exit reasons"
                );
                StepResult::Unmatched { state }
            }
        }
    }

    /// Run one SME step and return the state the caller should keep.
    pub fn sme(&self, handlers: &mut C, current: Option<S>, event: Event, extra: u32) -> Option<S>
    where
        C: Handlers<S>,
    {
        self.dispatch(handlers, current, event, extra).next_state()
    }

    fn fire(
        &self,
        handlers: &mut C,
        current: S,
        event: &Event,
        extra: u32,
    ) -> Option<(usize, Option<S>)> {
        let (row, transition) = self.lookup(current, event, extra)?;
        trace!(
            row,
            from = current.name(),
            to = transition.to.as_ref().map(State::name),
            "transition {} selected",
            row
        );
        if let Some(action) = transition.action {
            action(handlers, event, extra);
        }
        Some((row, transition.to))
    }
}

impl<S, C> Clone for TransitionTable<'_, S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, C> Copy for TransitionTable<'_, S, C> {}

/// Search `table` for the next state of `current`, running the selected
/// row's action.
///
/// Matches on `(from, reason1, reason3)`; the lowest matching index wins and
/// no match means the machine stays in `current`.
pub fn find_next_state<S: State, C>(
    table: &[Transition<S, C>],
    handlers: &mut C,
    current: S,
    event: &Event,
    extra: u32,
) -> Option<S> {
    TransitionTable::new(table).find_next_state(handlers, current, event, extra)
}

/// State Machine Engine: run the current state once and return the next one.
///
/// `None` in, `None` out, with nothing invoked. Otherwise the current state's
/// handler runs with `event` and `extra`; if it returns
/// [`StatusCode::Finished`] the table is searched with the exit reasons it
/// left behind, else the current state is returned unchanged.
///
/// # Example
///
/// ```rust
/// use cwsw::core::{Event, Handlers, StatusCode};
/// use cwsw::engine::{sme, Transition};
/// use cwsw::state_enum;
///
/// state_enum! {
///     enum Mode { A, B }
/// }
///
/// #[derive(Default)]
/// struct Ctx {
///     transitions: u32,
/// }
///
/// impl Handlers<Mode> for Ctx {
///     fn step(&mut self, state: Mode, event: &mut Event, extra: &mut u32) -> StatusCode {
///         match state {
///             Mode::A => {
///                 event.id = 7;
///                 *extra = 0;
///                 StatusCode::Finished
///             }
///             Mode::B => StatusCode::Operational,
///         }
///     }
/// }
///
/// fn bump(ctx: &mut Ctx, _event: &Event, _extra: u32) {
///     ctx.transitions += 1;
/// }
///
/// let table = [Transition::new(Mode::A, 7, 0, Mode::B).with_action(bump)];
/// let mut ctx = Ctx::default();
///
/// let next = sme(&table, &mut ctx, Some(Mode::A), Event::new(0), 0);
/// assert_eq!(next, Some(Mode::B));
/// assert_eq!(ctx.transitions, 1);
/// ```
pub fn sme<S: State, C: Handlers<S>>(
    table: &[Transition<S, C>],
    handlers: &mut C,
    current: Option<S>,
    event: Event,
    extra: u32,
) -> Option<S> {
    TransitionTable::new(table).sme(handlers, current, event, extra)
}
