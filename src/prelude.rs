//!
//! Convenience re-export of common members.
//!

pub use crate::runtime::Activate;
pub use crate::runtime::ActionKind;
pub use crate::runtime::Builder;
pub use crate::runtime::Mode;
pub use crate::runtime::Process;
pub use crate::runtime::ProcessId;
pub use crate::runtime::Profiler;
pub use crate::runtime::RunResult;
pub use crate::runtime::RuntimeLimit;
pub use crate::runtime::Sim;
pub use crate::runtime::SimError;

pub use crate::time::Duration;
pub use crate::time::SimTime;
