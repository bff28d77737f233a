//! # Task model
//!
//! `TaskConfig` is the immutable-after-registration description of a
//! periodic job; `TaskObject` is the mutable runtime state the supervisor
//! and job wrapper read and write every tick. Both are stored in a static
//! arena indexed by registration order — no heap, no dynamic allocation.

use crate::config::Tick;
use crate::policy::OverrunPolicy;

// ---------------------------------------------------------------------------
// Task configuration (immutable after registration)
// ---------------------------------------------------------------------------

/// A job body: a plain C-style entry point taking an opaque argument.
/// Never returns — a job body that returns is a logic error in the caller,
/// not something this layer recovers from.
pub type JobBody = extern "C" fn(*mut u8);

extern "C" fn noop_entry(_arg: *mut u8) {}

/// Static configuration for one periodic task, set at registration and
/// never mutated afterward. Kept alongside the runtime state in
/// [`TaskObject`] so the KILL policy's recreate path has everything it
/// needs without consulting the original registration table.
#[derive(Debug, Clone, Copy)]
pub struct TaskConfig {
    /// Human-readable name, used in trace output and recreate-on-KILL.
    pub name: &'static str,
    /// Nominal inter-release interval, in ticks. Must be `> 0`.
    pub period: Tick,
    /// Relative deadline, in ticks. `0` means "use period"; callers should
    /// prefer [`Self::effective_deadline`] over reading this field directly.
    pub deadline: Tick,
    /// Static priority. Must be strictly below the supervisor's.
    pub priority: u8,
    /// Stack size for the underlying RTOS task, in 32-bit words.
    pub stack_words: usize,
    /// The job body.
    pub entry: JobBody,
    /// Opaque argument passed to `entry` on every invocation.
    pub arg: *mut u8,
    /// Overrun policy, or [`OverrunPolicy::UseGlobal`] to defer to the
    /// registry default.
    pub policy: OverrunPolicy,
}

// Safety: `arg` is an opaque pointer handed back to the job body verbatim;
// this layer never dereferences it. Ownership/aliasing of whatever it
// points to is the integrator's contract with their own job bodies.
unsafe impl Send for TaskConfig {}
unsafe impl Sync for TaskConfig {}

impl TaskConfig {
    /// A config with a no-op body, used only to fill unused arena slots.
    pub const fn placeholder() -> Self {
        Self {
            name: "",
            period: 1,
            deadline: 0,
            priority: 0,
            stack_words: 0,
            entry: noop_entry,
            arg: core::ptr::null_mut(),
            policy: OverrunPolicy::UseGlobal,
        }
    }

    /// Relative deadline after normalization: `0` reads back as `period`.
    pub const fn effective_deadline(&self) -> Tick {
        if self.deadline == 0 {
            self.period
        } else {
            self.deadline
        }
    }
}

// ---------------------------------------------------------------------------
// Task runtime state
// ---------------------------------------------------------------------------

/// Per-task counters, snapshotted out of a [`TaskObject`] for callers that
/// only want statistics and not the live, mutating state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub jobs_completed: u32,
    pub deadline_misses: u32,
    pub overrun_skips: u32,
    pub overrun_kills: u32,
    pub overrun_catchups: u32,
}

impl TaskStats {
    /// Total overrun events of any kind, for the invariant in spec §8:
    /// `overrun_skips + overrun_kills + overrun_catchups == count(OVERRUN_* in trace)`.
    pub const fn overruns(&self) -> u32 {
        self.overrun_skips + self.overrun_kills + self.overrun_catchups
    }
}

/// Mutable runtime state for one registered task, one per arena slot.
///
/// `handle` is `None` for an unallocated slot and briefly while a KILLed
/// task is between the old handle's deletion and the new handle's
/// creation. Every other field is meaningful only when `active_slot` is
/// `true`.
pub struct TaskObject<H> {
    /// Embedded copy of the registration-time config — needed verbatim by
    /// the KILL policy's recreate path.
    pub config: TaskConfig,
    /// The underlying RTOS task handle, opaque to this layer.
    pub handle: Option<H>,
    /// Absolute tick of the next scheduled release.
    pub next_release: Tick,
    /// Absolute tick of the most recent actual release; the deadline
    /// origin for the current instance.
    pub current_release: Tick,
    /// `true` between notification-consumed and body-returned.
    pub active: bool,
    /// `true` once the current instance has been counted as late; reset
    /// at the next release.
    pub deadline_missed: bool,
    pub jobs_completed: u32,
    pub deadline_misses: u32,
    pub overrun_skips: u32,
    pub overrun_kills: u32,
    pub overrun_catchups: u32,
    /// Whether this arena slot holds a registered task at all.
    pub active_slot: bool,
}

// Safety: fields are mutated only by the supervisor and the task's own
// job wrapper, both of which serialize cross-writer access through the
// kernel's critical-section primitive (see `hal::Kernel::critical_section`).
unsafe impl<H: Send> Send for TaskObject<H> {}
unsafe impl<H: Send> Sync for TaskObject<H> {}

impl<H> TaskObject<H> {
    /// An empty (unregistered) arena slot, as an associated const so
    /// `[TaskObject::<H>::EMPTY; MAX_TASKS]` array-repeat initializers work
    /// without requiring `H: Copy`.
    pub const EMPTY: Self = Self::empty();

    /// An empty (unregistered) arena slot.
    pub const fn empty() -> Self {
        Self {
            config: TaskConfig::placeholder(),
            handle: None,
            next_release: 0,
            current_release: 0,
            active: false,
            deadline_missed: false,
            jobs_completed: 0,
            deadline_misses: 0,
            overrun_skips: 0,
            overrun_kills: 0,
            overrun_catchups: 0,
            active_slot: false,
        }
    }

    /// Register `config` into this slot: normalize the deadline, zero the
    /// counters, and mark the slot occupied. Release timing
    /// (`next_release`/`current_release`) is set later, by the supervisor's
    /// boot-time alignment pass, not here.
    pub fn init(&mut self, config: TaskConfig) {
        let mut config = config;
        config.deadline = config.effective_deadline();
        self.config = config;
        self.handle = None;
        self.next_release = 0;
        self.current_release = 0;
        self.active = false;
        self.deadline_missed = false;
        self.jobs_completed = 0;
        self.deadline_misses = 0;
        self.overrun_skips = 0;
        self.overrun_kills = 0;
        self.overrun_catchups = 0;
        self.active_slot = true;
    }

    /// This task's policy, resolved against the registry's default.
    pub fn effective_policy(&self, global_default: OverrunPolicy) -> OverrunPolicy {
        self.config.policy.resolve(global_default)
    }

    /// A snapshot of this task's counters.
    pub fn stats(&self) -> TaskStats {
        TaskStats {
            jobs_completed: self.jobs_completed,
            deadline_misses: self.deadline_misses,
            overrun_skips: self.overrun_skips,
            overrun_kills: self.overrun_kills,
            overrun_catchups: self.overrun_catchups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(period: Tick, deadline: Tick, policy: OverrunPolicy) -> TaskConfig {
        TaskConfig {
            name: "Test",
            period,
            deadline,
            priority: 1,
            stack_words: 256,
            entry: noop_entry,
            arg: core::ptr::null_mut(),
            policy,
        }
    }

    #[test]
    fn empty_slot_is_unregistered() {
        let t: TaskObject<u32> = TaskObject::empty();
        assert!(!t.active_slot);
        assert!(t.handle.is_none());
    }

    #[test]
    fn init_normalizes_zero_deadline_to_period() {
        let mut t: TaskObject<u32> = TaskObject::empty();
        t.init(cfg(100, 0, OverrunPolicy::Skip));
        assert_eq!(t.config.deadline, 100);
        assert!(t.active_slot);
    }

    #[test]
    fn init_keeps_explicit_deadline() {
        let mut t: TaskObject<u32> = TaskObject::empty();
        t.init(cfg(100, 40, OverrunPolicy::Kill));
        assert_eq!(t.config.deadline, 40);
    }

    #[test]
    fn init_resets_counters() {
        let mut t: TaskObject<u32> = TaskObject::empty();
        t.init(cfg(100, 0, OverrunPolicy::UseGlobal));
        t.jobs_completed = 5;
        t.deadline_misses = 2;
        t.init(cfg(100, 0, OverrunPolicy::UseGlobal));
        assert_eq!(t.jobs_completed, 0);
        assert_eq!(t.deadline_misses, 0);
    }

    #[test]
    fn effective_policy_defers_to_global() {
        let mut t: TaskObject<u32> = TaskObject::empty();
        t.init(cfg(100, 0, OverrunPolicy::UseGlobal));
        assert_eq!(t.effective_policy(OverrunPolicy::CatchUp), OverrunPolicy::CatchUp);
    }

    #[test]
    fn effective_policy_keeps_own_concrete_policy() {
        let mut t: TaskObject<u32> = TaskObject::empty();
        t.init(cfg(100, 0, OverrunPolicy::Skip));
        assert_eq!(t.effective_policy(OverrunPolicy::CatchUp), OverrunPolicy::Skip);
    }

    #[test]
    fn stats_overruns_sums_three_kinds() {
        let stats = TaskStats {
            jobs_completed: 0,
            deadline_misses: 0,
            overrun_skips: 2,
            overrun_kills: 1,
            overrun_catchups: 3,
        };
        assert_eq!(stats.overruns(), 6);
    }
}
