//! Machine instance that stores the current state between dispatches.

use crate::checkpoint::{Checkpoint, CheckpointError, MachineMetadata, CHECKPOINT_VERSION};
use crate::core::{Event, Handlers, State, StateHistory, StateTransition};
use crate::engine::table::{StepResult, TransitionTable};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Transitions a machine keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// One running state machine.
///
/// Owns the handler context and the current state, borrows the transition
/// table. Call [`tick`](Machine::tick) once per scheduler tick. The history
/// holds the last [`DEFAULT_HISTORY_LIMIT`] transitions by default, so a
/// machine cycling forever runs in bounded memory.
pub struct Machine<'t, S: State, C> {
    table: TransitionTable<'t, S, C>,
    handlers: C,
    initial: S,
    current: Option<S>,
    history: StateHistory<S>,
    ticks: u64,
    created_at: DateTime<Utc>,
}

impl<'t, S: State, C: Handlers<S>> Machine<'t, S, C> {
    /// Create a machine in its initial state.
    pub fn new(table: TransitionTable<'t, S, C>, handlers: C, initial: S) -> Self {
        Self::with_history_limit(table, handlers, initial, DEFAULT_HISTORY_LIMIT)
    }

    /// Create a machine keeping at most `limit` transitions; 0 keeps none.
    pub fn with_history_limit(
        table: TransitionTable<'t, S, C>,
        handlers: C,
        initial: S,
        limit: usize,
    ) -> Self {
        Self {
            table,
            handlers,
            initial,
            current: Some(initial),
            history: StateHistory::with_limit(limit),
            ticks: 0,
            created_at: Utc::now(),
        }
    }

    /// Deliver one event to the current state.
    pub fn tick(&mut self, event: Event, extra: u32) -> StepResult<S> {
        let result = self
            .table
            .dispatch(&mut self.handlers, self.current, event, extra);
        self.ticks += 1;

        if let StepResult::Transitioned { from, row, to } = result {
            self.history.push(StateTransition {
                from,
                to,
                row,
                tick: self.ticks,
                timestamp: Utc::now(),
            });
            if to.is_none() {
                debug!(
                    from = from.name(),
                    row,
                    transitions = self.history.recorded(),
                    elapsed = ?self.history.duration(),
                    "machine halted by transition"
                );
            }
        }

        self.current = result.next_state();
        result
    }

    /// Current state (pure). `None` once halted.
    pub fn current_state(&self) -> Option<S> {
        self.current
    }

    pub fn is_halted(&self) -> bool {
        self.current.is_none()
    }

    pub fn initial_state(&self) -> S {
        self.initial
    }

    /// Put the machine back in its initial state.
    ///
    /// Handler data is left alone; the handler context decides what
    /// re-entering means for each state.
    pub fn restart(&mut self) {
        debug!(initial = self.initial.name(), "machine restarted");
        self.current = Some(self.initial);
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Number of dispatches so far, halted ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn table(&self) -> TransitionTable<'t, S, C> {
        self.table
    }

    pub fn handlers(&self) -> &C {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut C {
        &mut self.handlers
    }

    pub fn into_handlers(self) -> C {
        self.handlers
    }

    /// Snapshot of everything except the table and handler context.
    pub fn checkpoint(&self) -> Checkpoint<S> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            initial_state: self.initial,
            current_state: self.current,
            history: self.history.clone(),
            metadata: MachineMetadata {
                created_at: self.created_at,
                updated_at: Utc::now(),
                ticks: self.ticks,
                transitions: self.history.recorded(),
            },
        }
    }

    /// Rebuild a machine from a checkpoint.
    ///
    /// The handler context is supplied fresh; restoring per-state data is up
    /// to the integrator.
    pub fn resume(
        table: TransitionTable<'t, S, C>,
        handlers: C,
        checkpoint: Checkpoint<S>,
    ) -> Result<Self, CheckpointError> {
        checkpoint.validate()?;
        debug!(
            id = %checkpoint.id,
            ticks = checkpoint.metadata.ticks,
            "resuming machine from checkpoint"
        );

        Ok(Self {
            table,
            handlers,
            initial: checkpoint.initial_state,
            current: checkpoint.current_state,
            history: checkpoint.history,
            ticks: checkpoint.metadata.ticks,
            created_at: checkpoint.metadata.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StatusCode;
    use crate::engine::Transition;
    use crate::state_enum;

    state_enum! {
        enum Workflow {
            Initial,
            Processing,
            Complete,
        }
    }

    /// Every state finishes on its second call with exit reason 1.
    #[derive(Default)]
    struct Steps {
        calls: u32,
        entered_complete: u32,
    }

    impl Handlers<Workflow> for Steps {
        fn step(&mut self, _state: Workflow, event: &mut Event, extra: &mut u32) -> StatusCode {
            self.calls += 1;
            if self.calls % 2 == 0 {
                event.id = 1;
                *extra = 0;
                StatusCode::Finished
            } else {
                StatusCode::Operational
            }
        }
    }

    fn mark_complete(steps: &mut Steps, _event: &Event, _extra: u32) {
        steps.entered_complete += 1;
    }

    const ROWS: [Transition<Workflow, Steps>; 3] = [
        Transition::new(Workflow::Initial, 1, 0, Workflow::Processing),
        Transition::row(
            Workflow::Processing,
            1,
            0,
            0,
            Some(Workflow::Complete),
            Some(mark_complete),
        ),
        Transition::halt(Workflow::Complete, 1, 0),
    ];

    fn machine(initial: Workflow) -> Machine<'static, Workflow, Steps> {
        Machine::new(TransitionTable::new(&ROWS), Steps::default(), initial)
    }

    #[test]
    fn multi_step_workflow() {
        let mut machine = machine(Workflow::Initial);

        assert!(matches!(machine.tick(Event::new(0), 0), StepResult::Remained { .. }));
        assert_eq!(machine.current_state(), Some(Workflow::Initial));

        assert_eq!(machine.tick(Event::new(0), 0).fired_row(), Some(0));
        assert_eq!(machine.current_state(), Some(Workflow::Processing));

        machine.tick(Event::new(0), 0);
        machine.tick(Event::new(0), 0);
        assert_eq!(machine.current_state(), Some(Workflow::Complete));
        assert_eq!(machine.handlers().entered_complete, 1);

        machine.tick(Event::new(0), 0);
        machine.tick(Event::new(0), 0);
        assert!(machine.is_halted());

        let path = machine.history().get_path();
        assert_eq!(
            path,
            vec![
                Some(Workflow::Initial),
                Some(Workflow::Processing),
                Some(Workflow::Complete),
                None
            ]
        );
        assert_eq!(machine.ticks(), 6);
        assert!(machine.history().duration().is_some());
    }

    #[test]
    fn halted_machine_stays_halted_until_restart() {
        let mut machine = machine(Workflow::Complete);

        machine.tick(Event::new(0), 0);
        machine.tick(Event::new(0), 0);
        assert!(machine.is_halted());

        let calls = machine.handlers().calls;
        assert_eq!(machine.tick(Event::new(0), 0), StepResult::Halted);
        assert_eq!(machine.handlers().calls, calls);

        machine.restart();
        assert_eq!(machine.current_state(), Some(Workflow::Complete));
    }

    #[test]
    fn history_records_row_and_tick() {
        let mut machine = machine(Workflow::Initial);

        machine.tick(Event::new(0), 0);
        machine.tick(Event::new(0), 0);

        let last = machine.history().last().unwrap();
        assert_eq!(last.row, 0);
        assert_eq!(last.tick, 2);
        assert_eq!(last.from, Workflow::Initial);
    }

    #[test]
    fn checkpoint_and_resume_preserve_position() {
        let mut machine = machine(Workflow::Initial);
        machine.tick(Event::new(0), 0);
        machine.tick(Event::new(0), 0);

        let checkpoint = machine.checkpoint();
        assert_eq!(checkpoint.metadata.transitions, 1);

        let resumed =
            Machine::resume(TransitionTable::new(&ROWS), Steps::default(), checkpoint).unwrap();
        assert_eq!(resumed.current_state(), Some(Workflow::Processing));
        assert_eq!(resumed.initial_state(), Workflow::Initial);
        assert_eq!(resumed.ticks(), 2);
        assert_eq!(resumed.history().len(), 1);
    }

    #[test]
    fn resume_rejects_unknown_version() {
        let machine = machine(Workflow::Initial);
        let mut checkpoint = machine.checkpoint();
        checkpoint.version = CHECKPOINT_VERSION + 1;

        let result = Machine::resume(TransitionTable::new(&ROWS), Steps::default(), checkpoint);
        assert!(matches!(result, Err(CheckpointError::UnsupportedVersion { .. })));
    }

    state_enum! {
        enum Blink {
            On,
            Off,
        }
    }

    struct AlwaysDone;

    impl Handlers<Blink> for AlwaysDone {
        fn step(&mut self, _state: Blink, event: &mut Event, extra: &mut u32) -> StatusCode {
            event.id = 1;
            *extra = 0;
            StatusCode::Finished
        }
    }

    const BLINK: [Transition<Blink, AlwaysDone>; 2] = [
        Transition::new(Blink::On, 1, 0, Blink::Off),
        Transition::new(Blink::Off, 1, 0, Blink::On),
    ];

    #[test]
    fn cyclic_machine_keeps_history_bounded() {
        let mut machine = Machine::new(TransitionTable::new(&BLINK), AlwaysDone, Blink::On);

        for _ in 0..20_000 {
            machine.tick(Event::new(0), 0);
        }

        let history = machine.history();
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.recorded(), 20_000);
        assert_eq!(history.last().unwrap().tick, 20_000);
        assert_eq!(machine.current_state(), Some(Blink::On));

        let resumed =
            Machine::resume(TransitionTable::new(&BLINK), AlwaysDone, machine.checkpoint())
                .unwrap();
        assert_eq!(resumed.history().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(resumed.history().limit(), Some(DEFAULT_HISTORY_LIMIT));
    }

    #[test]
    fn zero_history_limit_keeps_only_counts() {
        let mut machine =
            Machine::with_history_limit(TransitionTable::new(&BLINK), AlwaysDone, Blink::On, 0);

        for _ in 0..10 {
            machine.tick(Event::new(0), 0);
        }

        assert!(machine.history().is_empty());
        assert_eq!(machine.history().recorded(), 10);
        assert!(machine.checkpoint().validate().is_ok());
    }
}
