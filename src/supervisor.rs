//! # Supervisor
//!
//! The highest-priority one-tick state machine: release decisions,
//! deadline auditing, overrun classification, and the KILL procedure.
//! See spec §4.3. This module adds the supervisor-specific `impl` block
//! onto [`Ptl`]; the struct itself and its plumbing live in `ptl.rs`.

use crate::config::{Tick, SUPERVISOR_PERIOD_TICKS};
use crate::events::EventType;
use crate::hal::Kernel;
use crate::policy::OverrunPolicy;
use crate::ptl::Ptl;

impl<K: Kernel> Ptl<K> {
    /// One supervisor tick over every registered task, in registration
    /// order: deadline audit (A) then release decision (B).
    pub fn tick(&self, now: Tick) {
        let kernel = self.kernel();
        let tracing = self.tracing_enabled();
        let count = self.task_count();

        for i in 0..count {
            let (name, missed) = kernel.critical_section(|| {
                let t = &mut self.tasks_mut()[i];
                let deadline_abs = t.current_release + t.config.effective_deadline();
                let mut missed = false;
                if now >= deadline_abs && t.active && !t.deadline_missed {
                    t.deadline_missed = true;
                    t.deadline_misses += 1;
                    missed = true;
                }
                (t.config.name, missed)
            });
            if missed && tracing {
                kernel.critical_section(|| self.trace().append(Some(name), EventType::DeadlineMiss, now));
            }

            let next_release = kernel.critical_section(|| self.tasks_mut()[i].next_release);
            if now >= next_release {
                self.dispatch_release(i, now);
            }
        }
    }

    fn dispatch_release(&self, i: usize, now: Tick) {
        let kernel = self.kernel();
        let tracing = self.tracing_enabled();
        let global_default = self.global_policy();

        let (was_active, name, policy, handle) = kernel.critical_section(|| {
            let t = &mut self.tasks_mut()[i];
            let was_active = t.active;
            let policy = t.effective_policy(global_default);
            t.deadline_missed = false;
            (was_active, t.config.name, policy, t.handle)
        });

        if !was_active {
            kernel.critical_section(|| {
                if tracing {
                    self.trace().append(Some(name), EventType::Release, now);
                }
                let t = &mut self.tasks_mut()[i];
                t.current_release = t.next_release;
                t.next_release += t.config.period;
            });
            if let Some(h) = handle {
                kernel.notify_give(h);
            }
            return;
        }

        // Overrun: the previous instance is still running.
        match policy {
            OverrunPolicy::Skip => {
                kernel.critical_section(|| {
                    let t = &mut self.tasks_mut()[i];
                    t.overrun_skips += 1;
                    // one release discarded; xCurrentReleaseTime untouched
                    t.next_release += t.config.period;
                    if tracing {
                        self.trace().append(Some(name), EventType::OverrunSkip, now);
                    }
                });
            }
            OverrunPolicy::CatchUp => {
                kernel.critical_section(|| {
                    let t = &mut self.tasks_mut()[i];
                    t.overrun_catchups += 1;
                    t.deadline_misses += 1;
                    t.deadline_missed = true;
                    t.active = false;
                    t.current_release = t.next_release;
                    t.next_release += t.config.period;
                    if tracing {
                        self.trace().append(Some(name), EventType::OverrunCatchUp, now);
                        self.trace().append(Some(name), EventType::Release, now);
                    }
                });
                if let Some(h) = handle {
                    kernel.notify_give(h);
                }
            }
            OverrunPolicy::Kill => {
                kernel.critical_section(|| {
                    self.tasks_mut()[i].overrun_kills += 1;
                    if tracing {
                        self.trace().append(Some(name), EventType::OverrunKill, now);
                    }
                });
                self.apply_kill(i);
                let new_handle = kernel.critical_section(|| {
                    let t = &mut self.tasks_mut()[i];
                    t.current_release = t.next_release;
                    t.next_release += t.config.period;
                    if tracing {
                        self.trace().append(Some(name), EventType::Release, now);
                    }
                    t.handle
                });
                if let Some(h) = new_handle {
                    kernel.notify_give(h);
                }
            }
            OverrunPolicy::UseGlobal => {
                debug_assert!(false, "effective_policy never resolves to UseGlobal");
            }
        }
    }

    /// Delete the running task, clear its active/missed flags, and
    /// recreate it from the stored config. A recreate failure is fatal:
    /// the release contract cannot be honored without the task existing.
    fn apply_kill(&self, i: usize) {
        let kernel = self.kernel();
        let wrapper_entry = self.wrapper_entry().expect("apply_kill called before init");

        let (old_handle, name, stack_words, priority) = kernel.critical_section(|| {
            let t = &mut self.tasks_mut()[i];
            let old_handle = t.handle.take();
            t.active = false;
            t.deadline_missed = false;
            (old_handle, t.config.name, t.config.stack_words, t.config.priority)
        });

        if let Some(h) = old_handle {
            kernel.task_delete(h);
        }

        match kernel.task_create(wrapper_entry, name, stack_words, i as *mut u8, priority) {
            Ok(handle) => {
                kernel.critical_section(|| {
                    self.tasks_mut()[i].handle = Some(handle);
                });
            }
            Err(_) => fatal_halt(self, "KILL_RECREATE_FAILED"),
        }
    }
}

/// Append a fatal trace record (best effort) and halt. The two fatal error
/// classes (KILL recreate failure, stack overflow from a kernel hook) both
/// converge here: this layer cannot honor its release contract beyond this
/// point. `reason` is recorded in place of a task name so a trace dump
/// still shows why the system stopped.
pub(crate) fn fatal_halt<K: Kernel>(ptl: &Ptl<K>, reason: &'static str) -> ! {
    let kernel = ptl.kernel();
    let now = kernel.now();
    kernel.critical_section(|| ptl.trace().append(Some(reason), EventType::Fatal, now));
    loop {
        core::hint::spin_loop();
    }
}

/// The supervisor's own task body: calibrate the kernel's busy-wait
/// utility, align release timing against `now` (synchronous start, all
/// phases zero) and enter the one-tick delay-until loop forever. Called
/// from the integrator's supervisor trampoline — see [`crate::ptl`] module
/// docs.
pub fn run_supervisor_loop<K: Kernel>(ptl: &'static Ptl<K>) -> ! {
    let kernel = ptl.kernel();
    kernel.calibrate();
    let boot_tick = kernel.now();
    ptl.align_releases(boot_tick);
    let mut last_wake = boot_tick;
    loop {
        kernel.delay_until(&mut last_wake, SUPERVISOR_PERIOD_TICKS);
        let now = kernel.now();
        ptl.tick(now);
    }
}
