//! Nesting critical section / protected region.
//!
//! A [`CriticalSection`] counts how deeply protection is nested. Only the
//! outermost `protect` engages protection (through
//! [`CriticalHooks::on_enter_critical`]) and only the matching outermost
//! `release` disengages it. The counter is level-agnostic: `level` is handed
//! to the hooks untouched.
//!
//! The counter's logical range is `[0, i32::MAX]`. Leaving that range is
//! reported through the [`AssertHook`] and then handled best-effort:
//! - `protect` on a negative depth restarts counting from 0;
//! - `protect` at `i32::MAX` stays at `i32::MAX`;
//! - `release` at depth 0 (no matching `protect`) leaves the depth at 0.
//!
//! Place one in a `static` to protect a whole program:
//!
//! ```rust
//! use cwsw::critical::CriticalSection;
//!
//! static PROTECTION: CriticalSection = CriticalSection::const_default();
//!
//! let shared = PROTECTION.with(0, || {
//!     assert_eq!(PROTECTION.depth(), 1);
//!     42
//! });
//! assert_eq!(shared, 42);
//! assert_eq!(PROTECTION.depth(), 0);
//! ```

mod hooks;

pub use hooks::{CallbackHooks, CriticalHooks, NoHooks};

use crate::assertion::{AssertHook, AssertionFailure, LogAndContinue};
use std::panic::Location;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::debug;

/// Nesting counter around an architecture-specific protection mechanism.
///
/// The read-modify-write of the counter is a single atomic operation; the
/// hooks themselves must take effect synchronously.
#[derive(Debug)]
pub struct CriticalSection<H = NoHooks, A = LogAndContinue> {
    depth: AtomicI32,
    hooks: H,
    reporter: A,
}

impl CriticalSection {
    /// `NoHooks` and `LogAndContinue`, usable in a `static`.
    pub const fn const_default() -> Self {
        Self::new(NoHooks, LogAndContinue::new())
    }
}

impl Default for CriticalSection {
    fn default() -> Self {
        Self::const_default()
    }
}

impl<H, A> CriticalSection<H, A> {
    pub const fn new(hooks: H, reporter: A) -> Self {
        Self::with_depth(hooks, reporter, 0)
    }

    /// Start from an arbitrary depth, e.g. one restored after a warm reset.
    pub const fn with_depth(hooks: H, reporter: A, depth: i32) -> Self {
        Self {
            depth: AtomicI32::new(depth),
            hooks,
            reporter,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> i32 {
        self.depth.load(Ordering::SeqCst)
    }

    /// Whether protection is currently engaged.
    pub fn is_engaged(&self) -> bool {
        self.depth() > 0
    }

    /// Force the depth back to 0 without calling any hook.
    ///
    /// Returns the depth that was discarded.
    pub fn reset(&self) -> i32 {
        let previous = self.depth.swap(0, Ordering::SeqCst);
        if previous != 0 {
            debug!(previous, "critical section depth reset");
        }
        previous
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn reporter(&self) -> &A {
        &self.reporter
    }
}

impl<H: CriticalHooks, A: AssertHook> CriticalSection<H, A> {
    /// Enter the protected region. Returns the new depth.
    #[track_caller]
    pub fn protect(&self, level: i32) -> i32 {
        self.protect_at(level, Location::caller())
    }

    /// Leave the protected region. Returns the new depth.
    #[track_caller]
    pub fn release(&self, level: i32) -> i32 {
        self.release_at(level, Location::caller())
    }

    /// Enter the protected region until the returned guard is dropped.
    #[track_caller]
    pub fn enter(&self, level: i32) -> CriticalGuard<'_, H, A> {
        let location = Location::caller();
        self.protect_at(level, location);
        CriticalGuard {
            section: self,
            level,
            location,
        }
    }

    /// Run `f` inside the protected region.
    #[track_caller]
    pub fn with<R>(&self, level: i32, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter(level);
        f()
    }

    fn protect_at(&self, level: i32, location: &'static Location<'static>) -> i32 {
        let previous = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
                Some(depth.max(0).saturating_add(1))
            })
            .unwrap_or_else(|depth| depth);

        self.report(
            (0..i32::MAX).contains(&previous),
            "(depth >= 0) && (depth < i32::MAX)",
            location,
        );

        if previous <= 0 {
            self.hooks.on_enter_critical(level, location.file(), location.line());
        }
        previous.max(0).saturating_add(1)
    }

    fn release_at(&self, level: i32, location: &'static Location<'static>) -> i32 {
        let previous = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
                Some(if depth > 0 { depth - 1 } else { 0 })
            })
            .unwrap_or_else(|depth| depth);

        self.report(previous > 0, "depth > 0", location);

        if previous == 1 {
            self.hooks.on_leave_critical(level, location.file(), location.line());
        }
        if previous > 0 {
            previous - 1
        } else {
            0
        }
    }

    fn report(&self, holds: bool, test: &'static str, location: &'static Location<'static>) {
        if !holds {
            // Attributed to the protect/release call site, not to this file.
            let failure = AssertionFailure {
                test,
                file: location.file(),
                line: location.line(),
                description: "Invalid Critical Section Protection Count",
            };
            self.reporter.assert_log(&failure);
        }
    }
}

/// Keeps a [`CriticalSection`] engaged; releases it on drop.
#[must_use = "the region is released as soon as the guard is dropped"]
pub struct CriticalGuard<'a, H: CriticalHooks, A: AssertHook> {
    section: &'a CriticalSection<H, A>,
    level: i32,
    location: &'static Location<'static>,
}

impl<H: CriticalHooks, A: AssertHook> CriticalGuard<'_, H, A> {
    pub fn level(&self) -> i32 {
        self.level
    }
}

impl<H: CriticalHooks, A: AssertHook> Drop for CriticalGuard<'_, H, A> {
    fn drop(&mut self) {
        self.section.release_at(self.level, self.location);
    }
}
