use crate::time::SimTime;

/// The outcome of a call to [`Sim::run_simulation`](crate::runtime::Sim::run_simulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunResult {
    /// The call was made while a run was already in progress
    /// and had no effect.
    Reentrant,
    /// The schedule was empty, no action was taken.
    EmptySimulation {
        /// The virtual time at the end of the run.
        time: SimTime,
    },
    /// The schedule was drained completely.
    Finished {
        /// The virtual time of the last action.
        time: SimTime,
        /// The number of actions taken from the schedule during this run.
        event_count: usize,
    },
    /// The run was stopped by [`Sim::stop_simulation`](crate::runtime::Sim::stop_simulation)
    /// or a [`RuntimeLimit`](crate::runtime::RuntimeLimit), leaving actions behind.
    /// Calling `run_simulation` again resumes with those actions.
    PrematureAbort {
        /// The virtual time of the last action.
        time: SimTime,
        /// The number of actions taken from the schedule during this run.
        event_count: usize,
        /// The number of actions still scheduled.
        active_events: usize,
    },
}

impl RunResult {
    /// The virtual time the run ended at, `None` for a reentrant call.
    #[must_use]
    pub fn time(&self) -> Option<SimTime> {
        match self {
            Self::Reentrant => None,
            Self::EmptySimulation { time }
            | Self::Finished { time, .. }
            | Self::PrematureAbort { time, .. } => Some(*time),
        }
    }

    /// The number of actions taken from the schedule during the run.
    #[must_use]
    pub fn event_count(&self) -> usize {
        match self {
            Self::Reentrant | Self::EmptySimulation { .. } => 0,
            Self::Finished { event_count, .. } | Self::PrematureAbort { event_count, .. } => {
                *event_count
            }
        }
    }
}
