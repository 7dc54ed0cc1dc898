//! State handlers and the per-state lifecycle.
//!
//! A state handler is anything with the capability
//! `step(event, extra) -> StatusCode`. The data a state keeps between
//! invocations belongs to the handler value itself, which in turn belongs to
//! the integrator's handler context, never to the engine.

use super::state::{Event, State, StatusCode};

/// Capability shared by every state: run one step.
///
/// The handler may rewrite both `event` and `extra` in place; when it returns
/// [`StatusCode::Finished`] their contents are the exit reasons the engine
/// uses to search the transition table.
///
/// Closures with the matching signature are handlers too:
///
/// ```rust
/// use cwsw::core::{Event, StateHandler, StatusCode};
///
/// let mut finish_on_seven = |event: &mut Event, _extra: &mut u32| {
///     if event.id == 7 { StatusCode::Finished } else { StatusCode::Operational }
/// };
///
/// let mut extra = 0;
/// assert_eq!(finish_on_seven.step(&mut Event::new(7), &mut extra), StatusCode::Finished);
/// ```
pub trait StateHandler {
    /// Run one step of this state.
    fn step(&mut self, event: &mut Event, extra: &mut u32) -> StatusCode;
}

impl<F> StateHandler for F
where
    F: FnMut(&mut Event, &mut u32) -> StatusCode,
{
    fn step(&mut self, event: &mut Event, extra: &mut u32) -> StatusCode {
        self(event, extra)
    }
}

/// Handler context of one machine instance.
///
/// Maps a state identifier to the handler that embodies it. The context owns
/// every state's persistent data, so several machine instances built from the
/// same table never share storage. Transition actions receive the same
/// context mutably.
///
/// # Example
///
/// ```rust
/// use cwsw::core::{Event, Handlers, State, StatusCode};
/// use cwsw::state_enum;
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
///
/// struct DoorHandlers {
///     closes: u32,
/// }
///
/// impl Handlers<Door> for DoorHandlers {
///     fn step(&mut self, state: Door, _event: &mut Event, _extra: &mut u32) -> StatusCode {
///         match state {
///             Door::Open => StatusCode::Finished,
///             Door::Closed => {
///                 self.closes += 1;
///                 StatusCode::Operational
///             }
///         }
///     }
/// }
/// ```
pub trait Handlers<S: State> {
    /// Run the handler for `state`.
    fn step(&mut self, state: S, event: &mut Event, extra: &mut u32) -> StatusCode;
}

/// The three phases of a state's lifetime, as seen by [`Phased`].
///
/// Only `operational` is required. `on_exit` is where a state writes its exit
/// reasons into `event` and `extra`.
pub trait PhaseActions {
    /// Entry action. Runs on first entry and on every re-entry.
    fn on_entry(&mut self, _event: &Event, _extra: u32) {}

    /// In-state behaviour. Return `true` to request the exit action.
    fn operational(&mut self, event: &Event, extra: u32) -> bool;

    /// Exit action. Must not fail.
    fn on_exit(&mut self, _event: &mut Event, _extra: &mut u32) {}
}

/// Drives a [`PhaseActions`] implementation through
/// entry, operational, exit and finished.
///
/// | phase before call            | runs          | returns                        |
/// |------------------------------|---------------|--------------------------------|
/// | `Uninitialized` / `Finished` | `on_entry`    | `Operational`                  |
/// | `Operational`                | `operational` | `Operational` or `ExitPending` |
/// | `ExitPending`                | `on_exit`     | `Finished`                     |
///
/// A `Finished` phase means the state was left and is being entered again,
/// so the entry action runs once more.
#[derive(Clone, Debug, Default)]
pub struct Phased<A> {
    actions: A,
    phase: StatusCode,
}

impl<A: PhaseActions> Phased<A> {
    /// Wrap the actions; the first step will run the entry action.
    pub fn new(actions: A) -> Self {
        Self {
            actions,
            phase: StatusCode::Uninitialized,
        }
    }

    /// Phase reached after the last step.
    pub fn phase(&self) -> StatusCode {
        self.phase
    }

    /// Forget progress; the next step runs the entry action.
    pub fn reset(&mut self) {
        self.phase = StatusCode::Uninitialized;
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut A {
        &mut self.actions
    }
}

impl<A: PhaseActions> StateHandler for Phased<A> {
    fn step(&mut self, event: &mut Event, extra: &mut u32) -> StatusCode {
        self.phase = match self.phase {
            StatusCode::Uninitialized | StatusCode::Finished => {
                self.actions.on_entry(event, *extra);
                StatusCode::Operational
            }
            StatusCode::Operational => {
                if self.actions.operational(event, *extra) {
                    StatusCode::ExitPending
                } else {
                    StatusCode::Operational
                }
            }
            StatusCode::ExitPending => {
                self.actions.on_exit(event, extra);
                StatusCode::Finished
            }
        };
        self.phase
    }
}
