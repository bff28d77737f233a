//! # PTL — Periodic Task Layer
//!
//! A thin, hard-real-time supervisor that sits atop a preemptive
//! fixed-priority RTOS kernel and turns a static table of periodic jobs
//! into a guaranteed release/deadline/overrun contract.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Application Jobs                     │
//! ├────────────────────────────────────────────────────────┤
//! │                 Top-level API (ptl.rs)                  │
//! │        init() · start() · task_stats() · trace_stats()   │
//! ├──────────────────────┬───────────────────────────────┤
//! │   Supervisor loop     │        Job Wrapper             │
//! │   supervisor.rs       │        wrapper.rs              │
//! │   ─ release/deadline  │        ─ run_wrapper_for()     │
//! │     audit · dispatch  │                                │
//! │     overrun policy    │                                │
//! ├──────────────────────┴───────────────────────────────┤
//! │              Task model (task.rs) + Trace (trace.rs)     │
//! │    TaskConfig · TaskObject · TraceRing · TraceStats      │
//! ├────────────────────────────────────────────────────────┤
//! │           Kernel collaborator interface (hal.rs)         │
//! │    task.create/delete · notify · time · critical section │
//! ├────────────────────────────────────────────────────────┤
//! │   Real RTOS (hal_freertos.rs, feature = "cortex-m4")     │
//! │   or a host simulator provided by the integrator          │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What this crate does not do
//!
//! The underlying RTOS — task creation/deletion, the preemptive scheduler
//! itself, per-task notifications, critical sections, the monotonic clock —
//! is deliberately out of scope. It is specified here only as the
//! [`hal::Kernel`] trait: an abstract collaborator the supervisor and job
//! wrapper are generic over. This is what makes the core testable on a
//! desktop host without any real hardware or a vendored RTOS: an integrator
//! (or this crate's own test suite) supplies a `Kernel` implementation and
//! the rest of the logic — release timing, deadline auditing, overrun
//! policy dispatch, tracing — is identical on hardware and on a host
//! simulator.
//!
//! ## Memory model
//!
//! - **No heap, no `alloc`**: pure `core`, fixed-size arenas throughout.
//! - **Static task arena**: `[TaskObject<H>; config::MAX_TASKS]`.
//! - **Fixed-capacity trace ring**: `[TraceRecord; config::TRACE_CAPACITY]`.
//! - **Critical sections**: all cross-writer fields are mutated only inside
//!   `Kernel::critical_section` / `critical_section_from_isr`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod hal;
#[cfg(feature = "cortex-m4")]
pub mod hal_freertos;
pub mod policy;
pub mod ptl;
pub mod supervisor;
pub mod task;
pub mod trace;
pub mod wrapper;

pub use config::{GlobalConfig, Tick};
pub use error::PtlError;
pub use events::EventType;
pub use hal::Kernel;
pub use policy::OverrunPolicy;
pub use ptl::Ptl;
pub use task::{TaskConfig, TaskStats};
pub use trace::TraceStats;
pub use wrapper::run_wrapper_for;
