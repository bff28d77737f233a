//! # PTL Configuration
//!
//! Compile-time constants governing the supervisor, registry and trace
//! ring. All limits are fixed at compile time — no dynamic allocation.

use crate::policy::OverrunPolicy;

/// Monotonic kernel tick. One tick is one millisecond for the reference
/// configuration; the supervisor and trace ring are otherwise unit-agnostic.
pub type Tick = u32;

/// Maximum number of tasks the registry can hold. Bounds the static
/// [`crate::task::TaskObject`] arena.
pub const MAX_TASKS: usize = 8;

/// Capacity of the trace ring, in records. Power of two, per the reference
/// configuration, so index wrap is a cheap mask rather than a modulo — kept
/// as a plain constant rather than a type-level power-of-two guard since the
/// ring indexes with `%` regardless.
pub const TRACE_CAPACITY: usize = 1024;

/// Supervisor period, in ticks. Fixed at one tick: the supervisor is a
/// one-tick state machine, not a configurable polling loop.
pub const SUPERVISOR_PERIOD_TICKS: Tick = 1;

/// Supervisor stack size, expressed as a multiplier over
/// [`MINIMAL_STACK_WORDS`]. The supervisor's own call depth is shallow and
/// fixed, but headroom is kept for diagnostic formatting on the fatal-halt
/// path.
pub const SUPERVISOR_STACK_MULTIPLIER: usize = 2;

/// Smallest stack, in 32-bit words, considered safe for a job body that
/// does no recursion and no large locals.
pub const MINIMAL_STACK_WORDS: usize = 128;

/// Maximum length, in bytes, of a task's human-readable name. Names longer
/// than this are a configuration error at registration.
pub const TASK_NAME_MAX_LEN: usize = 16;

/// Overhead threshold used by [`crate::diagnostics::print_statistics`]'s
/// pass/fail verdict: `1 - utilization <= OVERHEAD_PASS_THRESHOLD_PCT`.
pub const OVERHEAD_PASS_THRESHOLD_PCT: f32 = 10.00;

/// Below this utilization the overhead verdict is not meaningful and is
/// reported as such rather than pass/fail.
pub const OVERHEAD_VERDICT_MIN_UTILIZATION_PCT: f32 = 50.00;

/// System-wide configuration, registered once at [`crate::ptl::Ptl::init`].
#[derive(Debug, Clone, Copy)]
pub struct GlobalConfig {
    /// Overrun policy applied to any task whose own policy is
    /// [`OverrunPolicy::UseGlobal`].
    pub default_policy: OverrunPolicy,
    /// Whether the trace ring records events at all. Off entirely elides
    /// the append calls on the hot path, not just the printing.
    pub tracing_enabled: bool,
    /// Declared maximum task count. Must be `>= registered count` and
    /// `<= MAX_TASKS`; see [`crate::ptl::Ptl::init`].
    pub max_tasks: usize,
}

impl GlobalConfig {
    pub const fn new(default_policy: OverrunPolicy, tracing_enabled: bool, max_tasks: usize) -> Self {
        Self { default_policy, tracing_enabled, max_tasks }
    }
}
