use std::time::{Duration, Instant, SystemTime};

/// Bookkeeping of the actions handled by a scheduler.
///
/// Counters accumulate over all runs of a scheduler and are
/// reset by [`Sim::clear`](crate::runtime::Sim::clear).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profiler {
    /// The number of actions added to the schedule, deferred ones included.
    pub scheduled: usize,
    /// The number of actions taken from the schedule.
    pub event_count: usize,
    /// The number of actions whose callback was invoked.
    pub dispatched: usize,
    /// The number of actions silently discarded, either because the target
    /// was terminated or because a sequential process was busy.
    pub dropped: usize,
    /// The number of actions re-enqueued for a busy queueing process.
    pub deferred: usize,

    /// The wall-clock point where the last run started.
    pub simulation_start: SystemTime,
    /// The wall-clock duration of the last run.
    pub duration: Duration,

    time_start: Instant,
}

impl Profiler {
    /// Starts the profile of a run.
    pub(super) fn start(&mut self) {
        self.simulation_start = SystemTime::now();
        self.time_start = Instant::now();
    }

    /// Finishes the profile of a run.
    pub(super) fn finish(&mut self) {
        self.duration = self.time_start.elapsed();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self {
            scheduled: 0,
            event_count: 0,
            dispatched: 0,
            dropped: 0,
            deferred: 0,

            simulation_start: SystemTime::now(),
            duration: Duration::ZERO,
            time_start: Instant::now(),
        }
    }
}
