//! # Kernel collaborator interface
//!
//! The underlying RTOS — task creation/deletion, the preemptive scheduler,
//! per-task notifications, critical sections, the monotonic clock — is out
//! of scope for this crate. This trait is the entire surface the
//! supervisor and job wrapper need from it. An integrator supplies a real
//! binding (see `hal_freertos`, behind the `cortex-m4` feature) or a host
//! simulator (as this crate's own `tests/` does) and the rest of the core
//! is identical either way.

use crate::config::Tick;
use crate::error::PtlError;

/// A task entry point as the kernel sees it: one pointer-sized argument,
/// never returns. Both the supervisor and every job wrapper are run this
/// way; the argument is how each instance finds its own state.
pub type EntryPoint = extern "C" fn(*mut u8);

/// The abstract RTOS collaborator. See spec-level external-interfaces
/// naming (`task.create`, `task.notifyGive`, `time.now`, `critical.enter`,
/// ...) — this trait is that interface made concrete in Rust.
pub trait Kernel: Copy {
    /// Opaque task handle. `Copy` because both the registry and the
    /// supervisor's KILL procedure need to hold and replace it freely.
    type TaskHandle: Copy;

    /// Create a task bound to `entry`, called with `arg` on every
    /// invocation the kernel performs, at `priority`, with `stack_words`
    /// words of stack.
    fn task_create(
        &self,
        entry: EntryPoint,
        name: &'static str,
        stack_words: usize,
        arg: *mut u8,
        priority: u8,
    ) -> Result<Self::TaskHandle, PtlError>;

    /// Irrevocably destroy a task. No finalizer is guaranteed to run.
    fn task_delete(&self, handle: Self::TaskHandle);

    /// Increment the target task's one-count release notification.
    /// Idempotent within one outstanding count — a second `notify_give`
    /// before the target has consumed the first does not stack.
    fn notify_give(&self, handle: Self::TaskHandle);

    /// Block the calling task until its own notification count is
    /// nonzero, then clear it. Never times out; release timing is the
    /// supervisor's responsibility, not this call's.
    fn notify_take(&self);

    /// Calibrate whatever bounded-time, side-effect-free busy-wait utility
    /// the underlying kernel provides to job bodies. Called exactly once,
    /// at supervisor boot, before release timing is aligned. This layer
    /// never reads a result back from it — the calibration's only observer
    /// is the kernel's own busy-wait helper, if it has one.
    fn calibrate(&self);

    /// The monotonic tick count. Wraps on the platform's native width.
    fn now(&self) -> Tick;

    /// Sleep until `*last_wake + period`, then advance `*last_wake` by
    /// `period`. Absolute-time scheduling: repeated calls do not
    /// accumulate drift the way a relative sleep would.
    fn delay_until(&self, last_wake: &mut Tick, period: Tick);

    /// Run `f` with the kernel's priority-preserving critical section
    /// held. Used outside interrupt/ISR context.
    fn critical_section<R>(&self, f: impl FnOnce() -> R) -> R;

    /// As [`Self::critical_section`], but safe to call from an ISR or
    /// kernel trace hook.
    fn critical_section_from_isr<R>(&self, f: impl FnOnce() -> R) -> R;

    /// Hand control to the kernel scheduler. Never returns.
    fn start_scheduler(&self) -> !;
}
