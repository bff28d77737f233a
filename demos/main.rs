//! # PTL Demonstration Firmware
//!
//! Three periodic jobs exercising all three overrun policies, mirroring
//! the reference demo this layer's supervisor contract was designed
//! against:
//!
//! | Job | Period | Deadline | Priority | Policy | Behavior |
//! |-----|--------|----------|----------|--------|----------|
//! | `Sensor` | 100 ms | 100 ms | 2 | UseGlobal (CatchUp) | ~10 ms of work, well inside its deadline |
//! | `ImgProc` | 50 ms | 50 ms | 1 | Kill | ~80 ms of work — the supervisor terminates and restarts it every period |
//! | `Logger` | 50 ms | 50 ms | 3 | Skip | ~60 ms of work — finishes late but safe; the following release is skipped |
//!
//! Build with `--features cortex-m4`. This firmware is illustrative: it
//! links against a real FreeRTOS build the way [`ptl::hal_freertos`]
//! expects, but ships no linker script or `FreeRTOSConfig.h` of its own.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;

use ptl::hal_freertos::FreeRtosKernel;
use ptl::{GlobalConfig, OverrunPolicy, Ptl, TaskConfig};

const STACK_WORDS: usize = 256;
const KERNEL_MAX_PRIORITY: u8 = 5;

static PTL: Ptl<FreeRtosKernel> = Ptl::new(
    FreeRtosKernel,
    GlobalConfig::new(OverrunPolicy::CatchUp, true, 3),
);

/// Busy-loop for roughly `iterations` units of work. A stand-in for the
/// calibrated busy-wait utility the original test suite uses — out of
/// scope for this crate's core, so the demo just spins.
fn spin(iterations: u32) {
    let mut acc: u32 = 0;
    for _ in 0..iterations {
        acc = acc.wrapping_add(1);
        core::hint::black_box(&mut acc);
    }
}

extern "C" fn job_sensor(_arg: *mut u8) {
    spin(10_000); // ~10ms of simulated work
}

extern "C" fn job_image_proc(_arg: *mut u8) {
    spin(80_000); // exceeds its 50ms deadline — KILL fires every period
}

extern "C" fn job_logger(_arg: *mut u8) {
    spin(60_000); // exceeds its 50ms deadline but finishes — SKIP drops the next release
}

extern "C" fn wrapper_trampoline(arg: *mut u8) {
    ptl::run_wrapper_for(&PTL, arg as usize);
}

extern "C" fn supervisor_trampoline(_arg: *mut u8) {
    ptl::supervisor::run_supervisor_loop(&PTL);
}

static TASKS: [TaskConfig; 3] = [
    TaskConfig {
        name: "Sensor",
        period: 100,
        deadline: 100,
        priority: 2,
        stack_words: STACK_WORDS,
        entry: job_sensor,
        arg: core::ptr::null_mut(),
        policy: OverrunPolicy::UseGlobal,
    },
    TaskConfig {
        name: "ImgProc",
        period: 50,
        deadline: 50,
        priority: 1,
        stack_words: STACK_WORDS,
        entry: job_image_proc,
        arg: core::ptr::null_mut(),
        policy: OverrunPolicy::Kill,
    },
    TaskConfig {
        name: "Logger",
        period: 50,
        deadline: 50,
        priority: 3,
        stack_words: STACK_WORDS,
        entry: job_logger,
        arg: core::ptr::null_mut(),
        policy: OverrunPolicy::Skip,
    },
];

#[entry]
fn main() -> ! {
    PTL.init(&TASKS, wrapper_trampoline).expect("PTL init failed");
    match PTL.start(supervisor_trampoline, KERNEL_MAX_PRIORITY) {
        Ok(never) => never,
        Err(_) => loop {
            core::hint::spin_loop();
        },
    }
}
