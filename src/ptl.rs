//! # Top-level API
//!
//! [`Ptl`] ties the registry, the trace ring and a [`Kernel`] together into
//! the single process-wide instance the supervisor and every job wrapper
//! operate on. Per the "global mutable state" design note, the registry,
//! global policy, tracing flag and trace ring are process-wide singletons
//! with a strict lifecycle: initialized exactly once before the scheduler
//! starts, never re-initialized, never torn down. This crate encapsulates
//! them behind one owning context — `Ptl<K>` — rather than module-scoped
//! statics; an integrator places one `static mut PTL: Ptl<ConcreteKernel>`
//! (mirroring how a FreeRTOS+Rust port holds its own scheduler state) and
//! writes two small `extern "C"` trampoline functions forwarding into
//! [`crate::wrapper::run_wrapper_for`] and [`crate::supervisor::run_supervisor_loop`] —
//! function pointers cannot close over state, so this shim is unavoidable
//! and is the only hand-written glue an integrator owns.

use core::cell::{Cell, UnsafeCell};
use core::fmt;

use crate::config::{GlobalConfig, Tick, MAX_TASKS, SUPERVISOR_STACK_MULTIPLIER, MINIMAL_STACK_WORDS};
use crate::diagnostics;
use crate::error::PtlError;
use crate::hal::{EntryPoint, Kernel};
use crate::policy::OverrunPolicy;
use crate::task::{TaskConfig, TaskObject, TaskStats};
use crate::trace::{TraceRing, TraceStats};

/// Supervisor priority relative to the kernel's maximum, per spec §4.3:
/// "created at priority = (kernel-max - 1)".
pub const SUPERVISOR_PRIORITY_OFFSET: u8 = 1;

/// The PTL instance: registry + trace ring + the `Kernel` binding they run
/// on. Generic over `K` so the exact same supervisor/wrapper logic runs
/// against real hardware and against a host test simulator.
pub struct Ptl<K: Kernel> {
    kernel: K,
    global: Cell<GlobalConfig>,
    tasks: UnsafeCell<[TaskObject<K::TaskHandle>; MAX_TASKS]>,
    count: Cell<usize>,
    initialized: Cell<bool>,
    trace: TraceRing,
    supervisor_handle: Cell<Option<K::TaskHandle>>,
    wrapper_entry: Cell<Option<EntryPoint>>,
}

// Safety: every field mutation below goes through `Cell`/`UnsafeCell` with
// the discipline that cross-writer fields are only touched inside
// `kernel.critical_section`/`critical_section_from_isr`, matching §5's
// "all cross-writer reads/writes use the kernel's priority-preserving
// critical-section primitive".
unsafe impl<K: Kernel> Sync for Ptl<K> {}

impl<K: Kernel> Ptl<K> {
    /// Construct a not-yet-initialized instance. `const fn` so an
    /// integrator can declare `static mut PTL: Ptl<MyKernel> = Ptl::new(...)`.
    pub const fn new(kernel: K, global: GlobalConfig) -> Self {
        Self {
            kernel,
            global: Cell::new(global),
            tasks: UnsafeCell::new([TaskObject::EMPTY; MAX_TASKS]),
            count: Cell::new(0),
            initialized: Cell::new(false),
            trace: TraceRing::new(),
            supervisor_handle: Cell::new(None),
            wrapper_entry: Cell::new(None),
        }
    }

    pub(crate) fn kernel(&self) -> K {
        self.kernel
    }

    pub(crate) fn trace(&self) -> &TraceRing {
        &self.trace
    }

    pub(crate) fn tracing_enabled(&self) -> bool {
        self.global.get().tracing_enabled
    }

    pub(crate) fn task_count(&self) -> usize {
        self.count.get()
    }

    pub(crate) fn global_policy(&self) -> OverrunPolicy {
        self.global.get().default_policy
    }

    /// Safety: caller holds the kernel critical section, or is the single
    /// init-time/boot-time setup path before any other task runs.
    #[allow(clippy::mut_from_ref)]
    pub(crate) fn tasks_mut(&self) -> &mut [TaskObject<K::TaskHandle>; MAX_TASKS] {
        unsafe { &mut *self.tasks.get() }
    }

    /// Register `configs` and create one RTOS task per entry bound to
    /// `wrapper_entry`. Validates: non-empty, within the declared task
    /// cap, positive periods, deadlines not exceeding periods, names
    /// within the length limit. Rejects a second call outright per
    /// "Init -> Init must fail ... already initialized".
    ///
    /// `wrapper_entry` is the integrator's trampoline into
    /// [`crate::wrapper::run_wrapper_for`]; see the module docs for why
    /// this one small shim cannot live inside this crate.
    pub fn init(&self, configs: &[TaskConfig], wrapper_entry: EntryPoint) -> Result<(), PtlError> {
        if self.initialized.get() {
            return Err(PtlError::AlreadyInitialized);
        }
        if configs.is_empty() {
            return Err(PtlError::NullConfig);
        }
        let global = self.global.get();
        let cap = MAX_TASKS.min(global.max_tasks);
        if configs.len() > cap {
            return Err(PtlError::InvalidTaskCount { count: configs.len(), max: cap });
        }
        for (i, c) in configs.iter().enumerate() {
            if c.period == 0 {
                return Err(PtlError::ZeroPeriod { index: i });
            }
            if c.deadline != 0 && c.deadline > c.period {
                return Err(PtlError::DeadlineExceedsPeriod { index: i });
            }
            if c.name.len() > crate::config::TASK_NAME_MAX_LEN {
                return Err(PtlError::NameTooLong { index: i });
            }
        }

        let tasks = self.tasks_mut();
        for (i, c) in configs.iter().enumerate() {
            tasks[i].init(*c);
        }
        self.count.set(configs.len());

        for i in 0..configs.len() {
            let (name, stack_words, priority) = {
                let t = &tasks[i];
                (t.config.name, t.config.stack_words, t.config.priority)
            };
            match self.kernel.task_create(wrapper_entry, name, stack_words, i as *mut u8, priority) {
                Ok(handle) => tasks[i].handle = Some(handle),
                Err(_) => return Err(PtlError::TaskCreateFailed { index: i }),
            }
        }

        self.wrapper_entry.set(Some(wrapper_entry));
        self.initialized.set(true);
        Ok(())
    }

    /// The wrapper trampoline registered at `init`, used by the KILL
    /// policy to recreate a terminated task. `None` before `init`.
    pub(crate) fn wrapper_entry(&self) -> Option<EntryPoint> {
        self.wrapper_entry.get()
    }

    /// Create the supervisor task at `kernel-max - 1` and hand control to
    /// the RTOS scheduler. `supervisor_entry` is the integrator's
    /// trampoline into [`crate::supervisor::run_supervisor_loop`].
    pub fn start(&self, supervisor_entry: EntryPoint, kernel_max_priority: u8) -> Result<!, PtlError> {
        if !self.initialized.get() {
            return Err(PtlError::NotInitialized);
        }
        let priority = kernel_max_priority.saturating_sub(SUPERVISOR_PRIORITY_OFFSET);
        let stack_words = MINIMAL_STACK_WORDS * SUPERVISOR_STACK_MULTIPLIER;
        match self.kernel.task_create(supervisor_entry, "Supervisor", stack_words, core::ptr::null_mut(), priority) {
            Ok(handle) => self.supervisor_handle.set(Some(handle)),
            Err(_) => return Err(PtlError::SupervisorCreateFailed),
        }
        self.kernel.start_scheduler()
    }

    /// `task.policy` when concrete, else the global default. A task index
    /// out of range (the spec's "null task") also yields the global
    /// default.
    pub fn get_effective_policy(&self, task_index: Option<usize>) -> OverrunPolicy {
        self.kernel().critical_section(|| match task_index.and_then(|i| self.tasks_mut().get(i)) {
            Some(t) if t.active_slot => t.effective_policy(self.global_policy()),
            _ => self.global_policy(),
        })
    }

    /// A snapshot of one task's counters, or `None` if `index` is out of
    /// range or unregistered.
    pub fn task_stats(&self, index: usize) -> Option<TaskStats> {
        self.kernel().critical_section(|| {
            let t = self.tasks_mut().get(index)?;
            t.active_slot.then(|| t.stats())
        })
    }

    /// Kernel idle-hook entry point: record the start of an idle interval.
    /// Called by the kernel's idle task/hook, not by the supervisor, so
    /// this runs the ISR-safe critical-section variant.
    pub fn on_idle_start(&self, now: Tick) {
        if self.tracing_enabled() {
            self.kernel.critical_section_from_isr(|| self.trace.idle_enter(now));
        }
    }

    /// Kernel idle-hook exit point: accumulate the elapsed idle interval.
    pub fn on_idle_end(&self, now: Tick) {
        if self.tracing_enabled() {
            self.kernel.critical_section_from_isr(|| self.trace.idle_exit(now));
        }
    }

    /// Kernel stack-overflow hook: fatal, per §7 — diagnostic and halt.
    pub fn on_stack_overflow(&self) -> ! {
        crate::supervisor::fatal_halt(self, "STACK_OVERFLOW")
    }

    /// A numeric snapshot of the trace ring's statistics reducer — the
    /// public counterpart of [`Self::print_statistics`] for callers that
    /// want the totals without formatting them through a sink.
    pub fn trace_stats(&self) -> TraceStats {
        self.trace.stats()
    }

    /// Dump every retained trace record to `sink` in `[<ticks>] <name>
    /// <event>` order, suppressing the supervisor's own SWITCH_IN/SWITCH_OUT
    /// records (matched by `supervisor_name_prefix`). See [`crate::diagnostics`].
    pub fn dump_trace<W: fmt::Write>(&self, sink: &mut W, supervisor_name_prefix: &str) -> fmt::Result {
        diagnostics::dump_trace(&self.trace, sink, supervisor_name_prefix)
    }

    /// Print totals, idle time, CPU utilization and the overhead pass/fail
    /// verdict to `sink`. See [`crate::diagnostics`].
    pub fn print_statistics<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result {
        diagnostics::print_statistics(&self.trace, sink)
    }

    /// Align every registered task's release timing to `now` — the
    /// supervisor's boot-time "synchronous start, all phases zero" step.
    pub(crate) fn align_releases(&self, now: Tick) {
        self.kernel.critical_section(|| {
            let tasks = self.tasks_mut();
            for t in tasks.iter_mut().take(self.count.get()) {
                t.next_release = now;
                t.current_release = now;
            }
        });
    }
}
