//! Project-level callbacks that engage and disengage protection.

use tracing::trace;

/// Architecture-specific protection, supplied by the integration.
///
/// `on_enter_critical` runs exactly when the nesting depth goes from 0 to 1
/// and must take effect before it returns (typically: disable interrupts up
/// to `level`). `on_leave_critical` runs exactly when the depth returns to 0.
/// `file` and `line` identify the code that called `protect`/`release`.
pub trait CriticalHooks {
    fn on_enter_critical(&self, level: i32, file: &'static str, line: u32);

    fn on_leave_critical(&self, level: i32, file: &'static str, line: u32);
}

impl<T: CriticalHooks + ?Sized> CriticalHooks for &T {
    fn on_enter_critical(&self, level: i32, file: &'static str, line: u32) {
        (**self).on_enter_critical(level, file, line)
    }

    fn on_leave_critical(&self, level: i32, file: &'static str, line: u32) {
        (**self).on_leave_critical(level, file, line)
    }
}

/// Hooks for hosts with nothing to disable; only traces the transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHooks;

impl CriticalHooks for NoHooks {
    fn on_enter_critical(&self, level: i32, file: &'static str, line: u32) {
        trace!(level, file, line, "critical region engaged");
    }

    fn on_leave_critical(&self, level: i32, file: &'static str, line: u32) {
        trace!(level, file, line, "critical region released");
    }
}

/// Hooks built from a pair of functions or closures.
///
/// ```rust
/// use cwsw::critical::{CallbackHooks, CriticalSection};
/// use cwsw::assertion::LogAndContinue;
///
/// fn disable_irq(_level: i32, _file: &'static str, _line: u32) {}
/// fn enable_irq(_level: i32, _file: &'static str, _line: u32) {}
///
/// type IrqFn = fn(i32, &'static str, u32);
///
/// static CS: CriticalSection<CallbackHooks<IrqFn, IrqFn>> = CriticalSection::new(
///     CallbackHooks::new(disable_irq as IrqFn, enable_irq as IrqFn),
///     LogAndContinue::new(),
/// );
///
/// assert_eq!(CS.protect(0), 1);
/// assert_eq!(CS.release(0), 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CallbackHooks<E, L> {
    enter: E,
    leave: L,
}

impl<E, L> CallbackHooks<E, L>
where
    E: Fn(i32, &'static str, u32),
    L: Fn(i32, &'static str, u32),
{
    pub const fn new(enter: E, leave: L) -> Self {
        Self { enter, leave }
    }
}

impl<E, L> CriticalHooks for CallbackHooks<E, L>
where
    E: Fn(i32, &'static str, u32),
    L: Fn(i32, &'static str, u32),
{
    fn on_enter_critical(&self, level: i32, file: &'static str, line: u32) {
        (self.enter)(level, file, line)
    }

    fn on_leave_critical(&self, level: i32, file: &'static str, line: u32) {
        (self.leave)(level, file, line)
    }
}
