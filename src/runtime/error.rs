use crate::runtime::ProcessId;
use std::{error::Error, fmt::Display};

/// An error returned by scheduler operations directed at a process.
///
/// These errors are informational: the scheduler state is unchanged
/// when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// The target process has already been terminated.
    AlreadyTerminated(ProcessId),
    /// The id was never issued, or was invalidated by [`Sim::clear`](crate::runtime::Sim::clear).
    UnknownProcess(ProcessId),
    /// The action directed at the process would be due after [`SimTime::MAX`](crate::time::SimTime::MAX).
    TimeOverflow(ProcessId),
}

impl SimError {
    /// The process the failed operation was directed at.
    #[must_use]
    pub fn pid(&self) -> ProcessId {
        match self {
            Self::AlreadyTerminated(pid) | Self::UnknownProcess(pid) | Self::TimeOverflow(pid) => {
                *pid
            }
        }
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyTerminated(pid) => write!(f, "process {pid} is already terminated"),
            Self::UnknownProcess(pid) if pid.is_null() => write!(f, "no process is dispatching"),
            Self::UnknownProcess(pid) => write!(f, "unknown process {pid}"),
            Self::TimeOverflow(pid) => {
                write!(f, "action for process {pid} overflows the simulation time")
            }
        }
    }
}

impl Error for SimError {}
