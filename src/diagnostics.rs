//! Trace dump and statistics printing. Writes to any `core::fmt::Write`
//! sink — a UART driver, a semihosting channel, or (in the host test
//! suite) a `String`. Formatting is the only place a fraction becomes a
//! percentage; [`crate::trace::TraceStats`] itself stays a `[0, 1]` fraction.

use core::fmt::{self, Write};

use crate::config::{OVERHEAD_PASS_THRESHOLD_PCT, OVERHEAD_VERDICT_MIN_UTILIZATION_PCT};
use crate::events::EventType;
use crate::trace::TraceRing;

/// Dump every retained trace record in `[<ticks>] <name> <event>` order.
///
/// `SWITCH_IN`/`SWITCH_OUT` records whose task name starts with
/// `supervisor_name_prefix` are suppressed to cut self-noise from the
/// supervisor's own context switches.
pub fn dump_trace<W: Write>(ring: &TraceRing, sink: &mut W, supervisor_name_prefix: &str) -> fmt::Result {
    writeln!(sink, "===== PTL TRACE =====")?;
    for record in ring.iter() {
        if matches!(record.event, EventType::SwitchIn | EventType::SwitchOut) {
            if let Some(name) = record.task_name {
                if name.starts_with(supervisor_name_prefix) {
                    continue;
                }
            }
        }
        let name = record.task_name.unwrap_or("SYS");
        writeln!(sink, "[{}] {} {}", record.timestamp, name, record.event.name())?;
    }
    writeln!(sink, "======================================")
}

/// Print totals, idle time, CPU utilization, and the overhead pass/fail
/// verdict (overhead `<= 10.00%`, meaningful only once utilization is at
/// least 50%).
pub fn print_statistics<W: Write>(ring: &TraceRing, sink: &mut W) -> fmt::Result {
    let stats = ring.stats();
    let utilization_pct = stats.cpu_utilization() * 100.0;
    let overhead_pct = 100.0 - utilization_pct;

    writeln!(sink, "Total Releases:      {}", stats.total_releases)?;
    writeln!(sink, "Total Completions:   {}", stats.total_completions)?;
    writeln!(sink, "Deadline Misses:     {}", stats.total_deadline_misses)?;
    writeln!(sink, "Overrun Events:      {}", stats.total_overruns)?;
    writeln!(sink, "Idle Time (ticks):   {}", stats.idle_time)?;
    writeln!(sink, "Total Time (ticks):  {}", stats.total_runtime)?;
    writeln!(sink, "CPU Utilization:     {:.2}%", utilization_pct)?;

    let verdict = if utilization_pct < OVERHEAD_VERDICT_MIN_UTILIZATION_PCT {
        "[N/A - utilization < 50%]"
    } else if overhead_pct <= OVERHEAD_PASS_THRESHOLD_PCT {
        "[OK]"
    } else {
        "[FAIL - required <= 10.00%]"
    };
    writeln!(sink, "System Overhead:     {overhead_pct:.2}% {verdict}")
}
