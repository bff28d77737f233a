//! Host `Kernel` implementation for integration tests: real OS threads,
//! real `Mutex`/`Condvar` blocking, one tick mapped to one millisecond of
//! wall-clock time. Deliberately not a deterministic single-threaded
//! stepper — the properties under test (preemption, overrun actually
//! happening because real time keeps advancing under a busy body) are
//! about wall-clock-observable concurrency.
//!
//! `task_delete` cannot forcibly stop a `std::thread` the way a real RTOS
//! stops a task — Rust's standard library has no such primitive. The old
//! thread is left to run to completion and is never joined; its tail
//! write into the shared task slot is mutex-serialized against the
//! replacement task's writes (no data race) but the two are not ordered
//! by this harness, which is the documented cooperative-cancellation
//! latency tradeoff for systems without forced termination, not a bug.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread;
use std::time::Duration;

use ptl::hal::{EntryPoint, Kernel};
use ptl::{PtlError, Tick};

const MAX_HANDLES: usize = 64;

struct SlotInner {
    notified: bool,
}

struct Slot {
    used: AtomicBool,
    inner: Mutex<SlotInner>,
    cv: Condvar,
}

impl Slot {
    const EMPTY: Self = Self {
        used: AtomicBool::new(false),
        inner: Mutex::new(SlotInner { notified: false }),
        cv: Condvar::new(),
    };
}

/// The shared world one test's `SimKernel` instances operate on: a
/// wall-clock-driven tick counter, a process-wide critical section, and a
/// fixed table of per-task notification slots.
pub struct SimWorld {
    clock: Mutex<Tick>,
    clock_cv: Condvar,
    cs: Mutex<()>,
    slots: [Slot; MAX_HANDLES],
}

impl SimWorld {
    pub const fn new() -> Self {
        Self {
            clock: Mutex::new(0),
            clock_cv: Condvar::new(),
            cs: Mutex::new(()),
            slots: [Slot::EMPTY; MAX_HANDLES],
        }
    }

    /// Start the background thread that advances the clock by one tick
    /// per real millisecond. Idempotent in spirit (tests call it once);
    /// calling it twice would just start a second driver, so don't.
    pub fn start(&'static self) -> &'static Self {
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(1));
            let mut clock = self.clock.lock().unwrap();
            *clock = clock.wrapping_add(1);
            drop(clock);
            self.clock_cv.notify_all();
        });
        self
    }

    fn alloc_slot(&self) -> Option<usize> {
        for i in 0..MAX_HANDLES {
            if self.slots[i].used.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                let mut inner = self.slots[i].inner.lock().unwrap();
                inner.notified = false;
                return Some(i);
            }
        }
        None
    }
}

thread_local! {
    static CURRENT_SLOT: Cell<Option<usize>> = const { Cell::new(None) };
}

/// A pointer-sized argument handed to a spawned task thread. Raw pointers
/// aren't `Send`; the entry/arg pair here is exactly what the real kernel
/// passes across the create/run boundary, so this is a transport wrapper,
/// not a soundness workaround.
struct TaskLaunch {
    entry: EntryPoint,
    arg: usize,
}
unsafe impl Send for TaskLaunch {}

/// `Kernel` implementation over [`SimWorld`]. `Copy` because it is only a
/// shared reference, matching how the real `Kernel` binding is a
/// zero-sized marker — all state lives in the world, not in this handle.
#[derive(Clone, Copy)]
pub struct SimKernel(pub &'static SimWorld);

impl Kernel for SimKernel {
    type TaskHandle = usize;

    fn task_create(
        &self,
        entry: EntryPoint,
        _name: &'static str,
        _stack_words: usize,
        arg: *mut u8,
        _priority: u8,
    ) -> Result<Self::TaskHandle, PtlError> {
        let slot = self.0.alloc_slot().ok_or(PtlError::TaskCreateFailed { index: 0 })?;
        let launch = TaskLaunch { entry, arg: arg as usize };
        thread::spawn(move || {
            CURRENT_SLOT.with(|c| c.set(Some(slot)));
            (launch.entry)(launch.arg as *mut u8);
        });
        Ok(slot)
    }

    fn task_delete(&self, _handle: Self::TaskHandle) {
        // See module docs: no forced-termination primitive on std threads.
        // The old thread is abandoned, not joined; it holds no handle back
        // into this world once its own slot stops being notified.
    }

    fn notify_give(&self, handle: Self::TaskHandle) {
        let mut inner = self.0.slots[handle].inner.lock().unwrap();
        inner.notified = true;
        self.0.slots[handle].cv.notify_one();
    }

    fn notify_take(&self) {
        let slot = CURRENT_SLOT.with(|c| c.get()).expect("notify_take called outside a SimKernel task thread");
        let mut inner = self.0.slots[slot].inner.lock().unwrap();
        while !inner.notified {
            inner = self.0.slots[slot].cv.wait(inner).unwrap();
        }
        inner.notified = false;
    }

    fn calibrate(&self) {
        // No CPU-cycle-to-tick ratio to calibrate on a host thread: the
        // simulated clock already ticks in real milliseconds.
    }

    fn now(&self) -> Tick {
        *self.0.clock.lock().unwrap()
    }

    fn delay_until(&self, last_wake: &mut Tick, period: Tick) {
        let target = last_wake.wrapping_add(period);
        let mut clock = self.0.clock.lock().unwrap();
        while *clock < target {
            clock = self.0.clock_cv.wait(clock).unwrap();
        }
        *last_wake = target;
    }

    fn critical_section<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.0.cs.lock().unwrap();
        f()
    }

    fn critical_section_from_isr<R>(&self, f: impl FnOnce() -> R) -> R {
        self.critical_section(f)
    }

    fn start_scheduler(&self) -> ! {
        loop {
            thread::park();
        }
    }
}

/// A job body whose busy time in milliseconds is encoded directly in its
/// `arg` pointer value. Lets every scenario below share one body function
/// instead of writing a new `extern "C" fn" per duration.
pub extern "C" fn busy_body(arg: *mut u8) {
    let ms = arg as usize as u64;
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

pub fn ms(n: u64) -> *mut u8 {
    n as usize as *mut u8
}
