//! # FreeRTOS `Kernel` binding (illustrative)
//!
//! A hand-written binding to genuine FreeRTOS C symbols, gated behind the
//! `cortex-m4` feature. This is deliberately not a full port: it exists to
//! show what a production [`Kernel`] implementation looks like, not to
//! replace a real FreeRTOS build integration (which would also need the
//! kernel's own headers, a linker script, and `FreeRTOSConfig.h`).
//!
//! Two simplifications are worth naming:
//! - `xTaskNotifyGive` and the `*_FROM_ISR` critical-section entry points
//!   are FreeRTOS macros, not exported symbols, in a stock build; linking
//!   against them directly as `extern "C"` assumes a build that exposes
//!   non-inlined wrappers (as some vendor SDKs do). A from-scratch
//!   integration would instead generate a tiny C shim translation unit.
//! - `TickType_t` is assumed to be 32 bits (`configTICK_TYPE_WIDTH_IN_BITS`
//!   left at its default), matching [`crate::config::Tick`].
//! - `Burn_Calibrate` is not a FreeRTOS symbol at all; it is the project's
//!   own busy-wait calibration utility, expected to be supplied by the
//!   integrator's build alongside their `FreeRTOSConfig.h`.

use core::ffi::c_void;

use crate::config::{Tick, TASK_NAME_MAX_LEN};
use crate::error::PtlError;
use crate::hal::{EntryPoint, Kernel};

mod ffi {
    use core::ffi::c_void;

    pub type TaskHandle = *mut c_void;
    pub type BaseType = i32;
    pub type UBaseType = u32;
    pub type TickType = u32;
    pub type StackDepthType = u16;
    pub type TaskFunction = extern "C" fn(*mut c_void);

    pub const PD_TRUE: BaseType = 1;
    pub const PD_PASS: BaseType = 1;

    extern "C" {
        pub fn xTaskCreate(
            code: TaskFunction,
            name: *const u8,
            stack_depth: StackDepthType,
            params: *mut c_void,
            priority: UBaseType,
            created_task: *mut TaskHandle,
        ) -> BaseType;
        pub fn vTaskDelete(task: TaskHandle);
        pub fn xTaskNotifyGive(task: TaskHandle) -> BaseType;
        pub fn ulTaskNotifyTake(clear_count_on_exit: BaseType, ticks_to_wait: TickType) -> u32;
        pub fn xTaskGetTickCount() -> TickType;
        pub fn vTaskDelayUntil(prev_wake_time: *mut TickType, time_increment: TickType);
        pub fn vTaskStartScheduler();
        pub fn vTaskEnterCritical();
        pub fn vTaskExitCritical();

        /// The project's own calibrated busy-wait utility. Not a FreeRTOS
        /// symbol: a bounded-time (roughly 100 ticks), side-effect-free-to-
        /// this-layer routine that times itself against the system tick to
        /// calibrate its iterations-per-millisecond constant for later use
        /// by job bodies. Supplied by the integrator's own build, same as
        /// `FreeRTOSConfig.h`.
        pub fn Burn_Calibrate();
    }
}

/// Zero-sized `Kernel` implementation binding directly to the FreeRTOS C
/// API. `Copy` because the real kernel state lives entirely on the
/// FreeRTOS side, not in this marker.
#[derive(Debug, Clone, Copy)]
pub struct FreeRtosKernel;

impl Kernel for FreeRtosKernel {
    type TaskHandle = ffi::TaskHandle;

    fn task_create(
        &self,
        entry: EntryPoint,
        name: &'static str,
        stack_words: usize,
        arg: *mut u8,
        priority: u8,
    ) -> Result<Self::TaskHandle, PtlError> {
        let mut name_buf = [0u8; TASK_NAME_MAX_LEN + 1];
        let bytes = name.as_bytes();
        let len = bytes.len().min(TASK_NAME_MAX_LEN);
        name_buf[..len].copy_from_slice(&bytes[..len]);

        // Safety: `EntryPoint` and `ffi::TaskFunction` are both
        // `extern "C" fn(*mut _)` over a single pointer-sized argument —
        // identical ABI, different pointee type.
        let entry: ffi::TaskFunction = unsafe { core::mem::transmute(entry) };

        let mut handle: ffi::TaskHandle = core::ptr::null_mut();
        let created = unsafe {
            ffi::xTaskCreate(
                entry,
                name_buf.as_ptr(),
                stack_words as ffi::StackDepthType,
                arg as *mut c_void,
                priority as ffi::UBaseType,
                &mut handle,
            )
        };
        if created == ffi::PD_PASS && !handle.is_null() {
            Ok(handle)
        } else {
            Err(PtlError::TaskCreateFailed { index: 0 })
        }
    }

    fn task_delete(&self, handle: Self::TaskHandle) {
        unsafe { ffi::vTaskDelete(handle) }
    }

    fn notify_give(&self, handle: Self::TaskHandle) {
        unsafe {
            ffi::xTaskNotifyGive(handle);
        }
    }

    fn notify_take(&self) {
        unsafe {
            ffi::ulTaskNotifyTake(ffi::PD_TRUE, ffi::TickType::MAX);
        }
    }

    fn calibrate(&self) {
        unsafe { ffi::Burn_Calibrate() }
    }

    fn now(&self) -> Tick {
        unsafe { ffi::xTaskGetTickCount() }
    }

    fn delay_until(&self, last_wake: &mut Tick, period: Tick) {
        unsafe { ffi::vTaskDelayUntil(last_wake as *mut Tick, period) }
    }

    fn critical_section<R>(&self, f: impl FnOnce() -> R) -> R {
        unsafe { ffi::vTaskEnterCritical() };
        let result = f();
        unsafe { ffi::vTaskExitCritical() };
        result
    }

    fn critical_section_from_isr<R>(&self, f: impl FnOnce() -> R) -> R {
        // See module docs: the real *_FROM_ISR entry points are macros.
        // A from-scratch port would generate a shim; this binding reuses
        // the non-ISR path since it is illustrative, not a full port.
        self.critical_section(f)
    }

    fn start_scheduler(&self) -> ! {
        unsafe { ffi::vTaskStartScheduler() };
        // Only reached if the idle task failed to allocate — fatal either way.
        loop {
            core::hint::spin_loop();
        }
    }
}
