//! # Job wrapper
//!
//! One instance of [`run_wrapper_for`] runs per registered task: wait for
//! a release notification, run the body, record completion, and
//! self-audit the deadline for the case the supervisor's own per-tick
//! audit cannot see — the body finishing late but before the *next*
//! release. See spec §4.2.

use crate::events::EventType;
use crate::hal::Kernel;
use crate::ptl::Ptl;

/// The per-task execution envelope. Blocks on the task's release
/// notification forever; never returns. `task_index` identifies which
/// arena slot this invocation serves — the one piece of state an
/// `extern "C" fn(*mut u8)` entry point cannot carry any other way.
pub fn run_wrapper_for<K: Kernel>(ptl: &'static Ptl<K>, task_index: usize) -> ! {
    let kernel = ptl.kernel();
    loop {
        kernel.notify_take();

        let (name, arg, entry, current_release, effective_deadline) = kernel.critical_section(|| {
            let t = &mut ptl.tasks_mut()[task_index];
            t.active = true;
            (t.config.name, t.config.arg, t.config.entry, t.current_release, t.config.effective_deadline())
        });

        let tracing = ptl.tracing_enabled();
        let start = kernel.now();
        if tracing {
            kernel.critical_section(|| ptl.trace().append(Some(name), EventType::Start, start));
        }

        entry(arg);

        let end = kernel.now();
        if tracing {
            kernel.critical_section(|| ptl.trace().append(Some(name), EventType::Complete, end));
        }

        // Self-audit (step e, §4.2): the supervisor's own per-tick deadline
        // check only sees a task while it is still active; a body that
        // finishes late but before the next release would otherwise never
        // be counted.
        kernel.critical_section(|| {
            let t = &mut ptl.tasks_mut()[task_index];
            let mut missed = false;
            if end > current_release + effective_deadline && !t.deadline_missed {
                t.deadline_missed = true;
                t.deadline_misses += 1;
                missed = true;
            }
            t.active = false;
            t.jobs_completed += 1;
            if missed && tracing {
                ptl.trace().append(Some(name), EventType::DeadlineMiss, end);
            }
        });
    }
}
