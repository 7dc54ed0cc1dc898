//! Property-based tests for the engine and the critical section.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated tables and call sequences.

use cwsw::assertion::RecordFailures;
use cwsw::core::{Event, Handlers, StatusCode};
use cwsw::critical::{CriticalHooks, CriticalSection};
use cwsw::engine::{find_next_state, sme, Machine, SecondaryDataMatch, Transition, TransitionTable};
use cwsw::state_enum;
use proptest::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

state_enum! {
    enum TestState {
        Initial,
        Processing,
        Complete,
        Failed,
    }
}

/// Every state returns `status` and leaves the configured exit reasons.
#[derive(Default)]
struct Fixture {
    status: StatusCode,
    exit: Event,
    exit_extra: u32,
    calls: u32,
    actions: u32,
}

impl Handlers<TestState> for Fixture {
    fn step(&mut self, _state: TestState, event: &mut Event, extra: &mut u32) -> StatusCode {
        self.calls += 1;
        *event = self.exit;
        *extra = self.exit_extra;
        self.status
    }
}

fn count_action(fixture: &mut Fixture, _event: &Event, _extra: u32) {
    fixture.actions += 1;
}

#[derive(Default)]
struct CountingHooks {
    enters: AtomicU32,
    leaves: AtomicU32,
}

impl CriticalHooks for CountingHooks {
    fn on_enter_critical(&self, _level: i32, _file: &'static str, _line: u32) {
        self.enters.fetch_add(1, Ordering::SeqCst);
    }

    fn on_leave_critical(&self, _level: i32, _file: &'static str, _line: u32) {
        self.leaves.fetch_add(1, Ordering::SeqCst);
    }
}

fn arbitrary_state() -> impl Strategy<Value = TestState> {
    prop_oneof![
        Just(TestState::Initial),
        Just(TestState::Processing),
        Just(TestState::Complete),
        Just(TestState::Failed),
    ]
}

fn non_finished_status() -> impl Strategy<Value = StatusCode> {
    prop_oneof![
        Just(StatusCode::Uninitialized),
        Just(StatusCode::Operational),
        Just(StatusCode::ExitPending),
    ]
}

prop_compose! {
    // Narrow reason ranges so that duplicate keys are common.
    fn arbitrary_row()(
        from in arbitrary_state(),
        reason1 in 0..3u32,
        reason2 in 0..3u32,
        reason3 in 0..2u32,
        to in prop::option::weighted(0.8, arbitrary_state()),
    ) -> Transition<TestState, Fixture> {
        Transition::row(from, reason1, reason2, reason3, to, Some(count_action))
    }
}

proptest! {
    #[test]
    fn lowest_matching_row_wins(
        rows in prop::collection::vec(arbitrary_row(), 0..12),
        current in arbitrary_state(),
        id in 0..3u32,
        data in 0..3u32,
        extra in 0..2u32,
    ) {
        let event = Event::with_data(id, data);
        let expected = rows
            .iter()
            .find(|row| row.from == current && row.reason1 == id && row.reason3 == extra);

        let mut fixture = Fixture::default();
        let next = find_next_state(&rows, &mut fixture, current, &event, extra);

        match expected {
            Some(row) => {
                prop_assert_eq!(next, row.to);
                prop_assert_eq!(fixture.actions, 1);
            }
            None => {
                prop_assert_eq!(next, Some(current));
                prop_assert_eq!(fixture.actions, 0);
            }
        }
    }

    #[test]
    fn compare_policy_matches_secondary_data(
        rows in prop::collection::vec(arbitrary_row(), 0..12),
        current in arbitrary_state(),
        id in 0..3u32,
        data in 0..3u32,
        extra in 0..2u32,
    ) {
        let event = Event::with_data(id, data);
        let table = TransitionTable::new(&rows).with_secondary_match(SecondaryDataMatch::Compare);
        let expected = rows.iter().position(|row| {
            row.from == current && row.reason1 == id && row.reason2 == data && row.reason3 == extra
        });

        prop_assert_eq!(table.lookup(current, &event, extra).map(|(index, _)| index), expected);
    }

    #[test]
    fn non_finished_status_never_transitions(
        rows in prop::collection::vec(arbitrary_row(), 0..12),
        current in arbitrary_state(),
        status in non_finished_status(),
        id in 0..3u32,
        extra in 0..2u32,
    ) {
        let mut fixture = Fixture {
            status,
            exit: Event::new(id),
            exit_extra: extra,
            ..Fixture::default()
        };

        let next = sme(&rows, &mut fixture, Some(current), Event::new(0), 0);

        prop_assert_eq!(next, Some(current));
        prop_assert_eq!(fixture.calls, 1);
        prop_assert_eq!(fixture.actions, 0);
    }

    #[test]
    fn halted_machine_runs_nothing(
        rows in prop::collection::vec(arbitrary_row(), 0..12),
        id in 0..3u32,
        extra in 0..2u32,
    ) {
        let mut fixture = Fixture {
            status: StatusCode::Finished,
            ..Fixture::default()
        };

        let next = sme(&rows, &mut fixture, None, Event::new(id), extra);

        prop_assert_eq!(next, None);
        prop_assert_eq!(fixture.calls, 0);
        prop_assert_eq!(fixture.actions, 0);
    }

    #[test]
    fn history_follows_machine_path(
        rows in prop::collection::vec(arbitrary_row(), 1..12),
        initial in arbitrary_state(),
        exits in prop::collection::vec((0..3u32, 0..2u32), 1..20),
    ) {
        let fixture = Fixture {
            status: StatusCode::Finished,
            ..Fixture::default()
        };
        let mut machine = Machine::new(TransitionTable::new(&rows), fixture, initial);

        let mut visited = vec![Some(initial)];
        for (id, extra) in exits {
            machine.handlers_mut().exit = Event::new(id);
            machine.handlers_mut().exit_extra = extra;
            if machine.tick(Event::new(0), 0).fired_row().is_some() {
                visited.push(machine.current_state());
            }
        }

        let path = machine.history().get_path();
        if path.is_empty() {
            prop_assert_eq!(visited.len(), 1);
        } else {
            prop_assert_eq!(path, visited);
        }
        let fired = machine.history().recorded();
        prop_assert_eq!(machine.handlers().actions as usize, fired);
    }

    #[test]
    fn balanced_protection_fires_hooks_once(depth in 1..64usize, level in any::<i32>()) {
        let cs = CriticalSection::new(CountingHooks::default(), RecordFailures::new());

        for expected in 1..=depth {
            prop_assert_eq!(cs.protect(level), expected as i32);
        }
        for expected in (0..depth).rev() {
            prop_assert_eq!(cs.release(level), expected as i32);
        }

        prop_assert_eq!(cs.depth(), 0);
        prop_assert_eq!(cs.hooks().enters.load(Ordering::SeqCst), 1);
        prop_assert_eq!(cs.hooks().leaves.load(Ordering::SeqCst), 1);
        prop_assert_eq!(cs.reporter().count(), 0);
    }

    #[test]
    fn depth_never_goes_negative(ops in prop::collection::vec(any::<bool>(), 0..64)) {
        let cs = CriticalSection::new(CountingHooks::default(), RecordFailures::new());
        let mut model = 0i32;
        let mut underflows = 0;
        let mut engagements = 0;

        for protect in ops {
            if protect {
                if model == 0 {
                    engagements += 1;
                }
                model += 1;
                prop_assert_eq!(cs.protect(0), model);
            } else {
                if model == 0 {
                    underflows += 1;
                } else {
                    model -= 1;
                }
                prop_assert_eq!(cs.release(0), model);
            }
            prop_assert!(cs.depth() >= 0);
        }

        prop_assert_eq!(cs.depth(), model);
        prop_assert_eq!(cs.reporter().count(), underflows);
        prop_assert_eq!(cs.hooks().enters.load(Ordering::SeqCst), engagements);
    }
}
