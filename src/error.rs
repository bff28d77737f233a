//! Error taxonomy. Invalid-configuration and resource-exhaustion classes
//! are reported once, to the [`crate::ptl::Ptl::init`] caller, as a
//! `Result`. Runtime classes (deadline miss, overrun) are not errors at
//! all — they are counted and traced. The two fatal runtime classes
//! (KILL-recreate failure, stack overflow) never return; see
//! [`crate::supervisor`].

use core::fmt;

/// Configuration and init-time failures. Every variant here is detected
/// before the scheduler starts; none of them occur at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtlError {
    /// `init` was called with a null/empty config slice.
    NullConfig,
    /// `count` was zero, or exceeded `min(MAX_TASKS, global.max_tasks)`.
    InvalidTaskCount { count: usize, max: usize },
    /// A task's name exceeded [`crate::config::TASK_NAME_MAX_LEN`].
    NameTooLong { index: usize },
    /// A task's deadline exceeded its period after normalization.
    DeadlineExceedsPeriod { index: usize },
    /// A task's period was zero.
    ZeroPeriod { index: usize },
    /// `init` was called a second time.
    AlreadyInitialized,
    /// The underlying kernel refused to create a task during `init`.
    TaskCreateFailed { index: usize },
    /// `start` was called before a successful `init`.
    NotInitialized,
    /// The underlying kernel refused to create the supervisor task.
    SupervisorCreateFailed,
}

impl fmt::Display for PtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullConfig => write!(f, "init called with no task configuration"),
            Self::InvalidTaskCount { count, max } => {
                write!(f, "task count {count} out of range (max {max})")
            }
            Self::NameTooLong { index } => write!(f, "task {index} name exceeds the name limit"),
            Self::DeadlineExceedsPeriod { index } => {
                write!(f, "task {index} deadline exceeds its period")
            }
            Self::ZeroPeriod { index } => write!(f, "task {index} has a zero period"),
            Self::AlreadyInitialized => write!(f, "init called more than once"),
            Self::TaskCreateFailed { index } => write!(f, "kernel rejected task {index} at init"),
            Self::NotInitialized => write!(f, "start called before a successful init"),
            Self::SupervisorCreateFailed => write!(f, "kernel rejected the supervisor task"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PtlError {}
