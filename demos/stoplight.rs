//! Stop Light
//!
//! This example drives a three-aspect stop light with the state machine
//! engine, one tick per loop iteration.
//!
//! Key concepts:
//! - Phased states (entry, operational, exit) with tick-count timers
//! - Exit reasons selecting the next table row
//! - A halt row that stops the machine after a few cycles
//! - Shared counters updated inside a critical section
//!
//! Run with: RUST_LOG=debug cargo run --example stoplight

use cwsw::core::{Event, Handlers, PhaseActions, Phased, StateHandler, StatusCode};
use cwsw::critical::CriticalSection;
use cwsw::engine::{Machine, StepResult, Transition, TransitionTable};
use cwsw::state_enum;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

state_enum! {
    enum StopLight {
        Red,
        Green,
        Yellow,
    }
}

const EV_NONE: u32 = 0;
const EV_TIMEOUT: u32 = 1;
const EV_SHUTDOWN: u32 = 2;

const CYCLES_BEFORE_SHUTDOWN: u32 = 3;

static PROTECTION: CriticalSection = CriticalSection::const_default();
static RED_ENTRIES: AtomicU32 = AtomicU32::new(0);

/// One lamp, lit for `on_ticks` operational ticks.
struct Lamp {
    name: &'static str,
    on_ticks: u32,
    remaining: u32,
    shutdown: bool,
}

impl Lamp {
    fn new(name: &'static str, on_ticks: u32) -> Self {
        Self {
            name,
            on_ticks,
            remaining: 0,
            shutdown: false,
        }
    }
}

impl PhaseActions for Lamp {
    fn on_entry(&mut self, _event: &Event, _extra: u32) {
        info!(lamp = self.name, ticks = self.on_ticks, "lamp on");
        self.remaining = self.on_ticks;
    }

    fn operational(&mut self, _event: &Event, _extra: u32) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    fn on_exit(&mut self, event: &mut Event, extra: &mut u32) {
        info!(lamp = self.name, "lamp off");
        event.id = if self.shutdown { EV_SHUTDOWN } else { EV_TIMEOUT };
        event.data = 0;
        *extra = 0;
    }
}

struct Intersection {
    red: Phased<Lamp>,
    green: Phased<Lamp>,
    yellow: Phased<Lamp>,
}

impl Handlers<StopLight> for Intersection {
    fn step(&mut self, state: StopLight, event: &mut Event, extra: &mut u32) -> StatusCode {
        match state {
            StopLight::Red => self.red.step(event, extra),
            StopLight::Green => self.green.step(event, extra),
            StopLight::Yellow => self.yellow.step(event, extra),
        }
    }
}

fn count_red(intersection: &mut Intersection, _event: &Event, _extra: u32) {
    let entries = PROTECTION.with(0, || RED_ENTRIES.fetch_add(1, Ordering::Relaxed) + 1);
    if entries >= CYCLES_BEFORE_SHUTDOWN {
        intersection.red.actions_mut().shutdown = true;
    }
}

const TABLE: [Transition<StopLight, Intersection>; 4] = [
    Transition::new(StopLight::Red, EV_TIMEOUT, 0, StopLight::Green),
    Transition::halt(StopLight::Red, EV_SHUTDOWN, 0),
    Transition::new(StopLight::Green, EV_TIMEOUT, 0, StopLight::Yellow),
    Transition::row(StopLight::Yellow, EV_TIMEOUT, 0, 0, Some(StopLight::Red), Some(count_red)),
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== Stop Light State Machine ===\n");

    let intersection = Intersection {
        red: Phased::new(Lamp::new("red", 4)),
        green: Phased::new(Lamp::new("green", 3)),
        yellow: Phased::new(Lamp::new("yellow", 1)),
    };
    let mut machine = Machine::new(TransitionTable::new(&TABLE), intersection, StopLight::Red);

    loop {
        match machine.tick(Event::new(EV_NONE), 0) {
            StepResult::Transitioned { from, to, row } => {
                println!("tick {:>3}: {:?} -> {:?} (row {})", machine.ticks(), from, to, row);
            }
            StepResult::Halted => break,
            StepResult::Remained { .. } | StepResult::Unmatched { .. } => {}
        }
    }

    println!("\nHalted after {} ticks", machine.ticks());
    println!("Path: {:?}", machine.history().get_path());
    println!("Red entered {} times", RED_ENTRIES.load(Ordering::Relaxed));

    println!("\n=== Example Complete ===");
}
