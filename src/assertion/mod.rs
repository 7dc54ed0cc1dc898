//! Assertion reporting.
//!
//! Violated invariants are reported through an [`AssertHook`] chosen by the
//! integrator. The default, [`LogAndContinue`], logs the diagnostic, waits
//! briefly and lets execution carry on: halting a deeply embedded system is
//! often worse than running on in a degraded state. Other policies can panic
//! or record, but every policy receives the full diagnostic.

use std::panic::Location;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::error;

/// Diagnostic for one failed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Assertion failed: \"{test}\", file::line: {file}::{line}\nDescription: {description}")]
pub struct AssertionFailure {
    /// Text of the test expression that failed.
    pub test: &'static str,
    pub file: &'static str,
    pub line: u32,
    /// What the test protects.
    pub description: &'static str,
}

/// Receives failed assertions.
pub trait AssertHook {
    fn assert_log(&self, failure: &AssertionFailure);
}

impl<T: AssertHook + ?Sized> AssertHook for &T {
    fn assert_log(&self, failure: &AssertionFailure) {
        (**self).assert_log(failure)
    }
}

/// Log the failure, busy-wait for a short uncalibrated time, then continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogAndContinue {
    spin_iterations: u32,
}

impl LogAndContinue {
    /// Default wait: one full sweep of a 16-bit countdown.
    pub const DEFAULT_SPIN_ITERATIONS: u32 = u16::MAX as u32;

    pub const fn new() -> Self {
        Self {
            spin_iterations: Self::DEFAULT_SPIN_ITERATIONS,
        }
    }

    /// Change the busy-wait length; 0 disables it.
    pub const fn with_spin_iterations(spin_iterations: u32) -> Self {
        Self { spin_iterations }
    }

    pub fn spin_iterations(&self) -> u32 {
        self.spin_iterations
    }
}

impl Default for LogAndContinue {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertHook for LogAndContinue {
    fn assert_log(&self, failure: &AssertionFailure) {
        error!(
            test = failure.test,
            file = failure.file,
            line = failure.line,
            description = failure.description,
            "assertion failed"
        );
        for _ in 0..self.spin_iterations {
            std::hint::spin_loop();
        }
    }
}

/// Treat every failed assertion as fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanicOnFailure;

impl AssertHook for PanicOnFailure {
    fn assert_log(&self, failure: &AssertionFailure) {
        error!(test = failure.test, description = failure.description, "assertion failed");
        panic!("{failure}");
    }
}

/// Keep every failure for later inspection, and continue.
#[derive(Debug, Default)]
pub struct RecordFailures {
    failures: Mutex<Vec<AssertionFailure>>,
}

impl RecordFailures {
    pub const fn new() -> Self {
        Self {
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Failures reported so far, oldest first.
    pub fn failures(&self) -> Vec<AssertionFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drain the recorded failures.
    pub fn take(&self) -> Vec<AssertionFailure> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl AssertHook for RecordFailures {
    fn assert_log(&self, failure: &AssertionFailure) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*failure);
    }
}

/// Report `test` through `hook` if `holds` is false, attributing it to the
/// caller's location. Returns `holds`.
#[track_caller]
pub fn check<H: AssertHook + ?Sized>(
    hook: &H,
    holds: bool,
    test: &'static str,
    description: &'static str,
) -> bool {
    if !holds {
        let location = Location::caller();
        hook.assert_log(&AssertionFailure {
            test,
            file: location.file(),
            line: location.line(),
            description,
        });
    }
    holds
}

/// Assert through a hook without stopping.
///
/// Evaluates to `true` when the condition holds; otherwise reports the
/// stringified condition, the location and the description, then evaluates
/// to `false`.
///
/// ```rust
/// use cwsw::assertion::RecordFailures;
/// use cwsw::cwsw_assert;
///
/// let hook = RecordFailures::new();
/// let depth = -1;
///
/// assert!(!cwsw_assert!(&hook, depth >= 0, "Invalid nesting depth"));
/// assert_eq!(hook.failures()[0].test, "depth >= 0");
/// ```
#[macro_export]
macro_rules! cwsw_assert {
    ($hook:expr, $cond:expr, $description:expr $(,)?) => {
        $crate::assertion::check($hook, $cond, stringify!($cond), $description)
    };
}
