//!
//! Central primitives for running a discrete event simulation.
//!

use crate::time::{Duration, SimTime};
use rand::{
    distr::{Distribution, StandardUniform},
    Rng, RngCore,
};
use std::{
    any::type_name,
    cell::RefCell,
    fmt::{Debug, Display},
    rc::Rc,
};
use tracing::{debug, info, info_span, trace};

mod action;
pub use self::action::ActionKind;
pub(crate) use self::action::{Action, Schedule};

mod builder;
pub use self::builder::*;

mod error;
pub use self::error::*;

mod limit;
pub use self::limit::*;

mod process;
pub use self::process::{Activate, Mode, Process, ProcessId};
pub(crate) use self::process::ProcessRecord;

mod profiler;
pub use self::profiler::*;

mod result;
pub use self::result::*;

///
/// A generic discrete-event sequential simulator.
///
/// A `Sim` owns the virtual clock, a time-ordered schedule of actions
/// and a registry of [`Process`]es. Running the simulation takes the
/// actions from the schedule in time order, dispatching each to the
/// callback of its target process. Actions due at the same virtual time
/// are dispatched in the order they were scheduled.
///
/// The type parameter `E` is the event payload exchanged between processes.
/// The scheduler never inspects it.
///
/// # Examples
///
/// ```
/// use ssim::prelude::*;
///
/// struct Echo;
/// impl Process<&'static str> for Echo {
///     fn process_event(&mut self, sim: &mut Sim<&'static str>, event: &'static str) {
///         assert_eq!(event, "ping");
///         assert_eq!(sim.clock(), SimTime::from(5.0));
///     }
/// }
///
/// let mut sim = Builder::seeded(1).quiet().build();
/// let pid = sim.create_process(Echo, Mode::CONCURRENT);
/// sim.signal_event("ping", pid, Duration::from_secs(5)).unwrap();
///
/// let result = sim.run_simulation();
/// assert_eq!(result, RunResult::Finished { time: SimTime::from(5.0), event_count: 2 });
/// ```
pub struct Sim<E> {
    processes: Vec<ProcessRecord<E>>,
    schedule: Schedule<E>,

    // Clock
    current_time: SimTime,
    current_delay: Duration,
    current_process: ProcessId,

    running: bool,
    locked: bool,
    // Bumped by `clear` to invalidate handles of in-flight callbacks.
    epoch: u64,

    limit: RuntimeLimit,
    quiet: bool,
    rng: Box<dyn RngCore>,
    profiler: Profiler,
}

impl<E> Sim<E> {
    ///
    /// Creates a new scheduler with the default configuration.
    /// See [`Builder`] for more options.
    ///
    #[must_use]
    pub fn new() -> Self {
        Builder::new().build()
    }

    pub(super) fn from_builder(builder: Builder) -> Self {
        Self {
            processes: Vec::new(),
            schedule: Schedule::new(),

            current_time: SimTime::ZERO,
            current_delay: Duration::ZERO,
            current_process: ProcessId::NULL,

            running: false,
            locked: false,
            epoch: 0,

            limit: builder.limit,
            quiet: builder.quiet,
            rng: builder.rng,
            profiler: Profiler::default(),
        }
    }

    ///
    /// Creates a new process, returning its id.
    ///
    /// Ids are issued sequentially, the first one being `1` after construction
    /// or [`clear`](Sim::clear), as `0` is reserved for [`ProcessId::NULL`].
    /// `mode` specifies the execution flags of the process, see [`Mode`].
    /// An init action is scheduled for the new process at the current
    /// virtual time, so that [`Process::init`] is its first dispatch.
    ///
    pub fn create_process<P>(&mut self, process: P, mode: Mode) -> ProcessId
    where
        P: Process<E> + 'static,
    {
        let pid = ProcessId::new(self.processes.len() + 1);
        self.processes
            .push(ProcessRecord::new(Box::new(process), mode));

        debug!(%pid, ?mode, "created process");
        self.schedule_at(self.current_time, Action::Init(pid));
        pid
    }

    ///
    /// Activates a shared process that keeps track of its own id.
    ///
    /// The same process can be activated only once: returns `None`
    /// if it already carries an id, and the id issued by
    /// [`create_process`](Sim::create_process) otherwise.
    ///
    pub fn activate<P>(&mut self, process: &Rc<RefCell<P>>, mode: Mode) -> Option<ProcessId>
    where
        P: Activate<E> + 'static,
    {
        if !process.borrow().pid().is_null() {
            return None;
        }

        let pid = self.create_process(Rc::clone(process), mode);
        process.borrow_mut().set_pid(pid);
        Some(pid)
    }

    ///
    /// Stops the execution of a given process.
    ///
    /// The stop action is scheduled at the current virtual time, so
    /// actions already scheduled for this process at the same or an earlier
    /// time are still dispatched first. The process is marked terminated once
    /// [`Process::stop`] has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns an error if the process is unknown or already terminated.
    ///
    pub fn stop_process(&mut self, pid: ProcessId) -> Result<(), SimError> {
        if self.record(pid)?.terminated {
            return Err(SimError::AlreadyTerminated(pid));
        }

        self.schedule_at(self.current_time, Action::Stop(pid));
        Ok(())
    }

    ///
    /// Stops the currently dispatching process.
    /// See [`stop_process`](Sim::stop_process).
    ///
    /// # Errors
    ///
    /// Returns an error if no process is dispatching or if the
    /// current process is already terminated.
    ///
    pub fn stop_this_process(&mut self) -> Result<(), SimError> {
        self.stop_process(self.current_process)
    }

    ///
    /// Signals an event to the given process, to be handled
    /// `delay` after the current [`clock`](Sim::clock).
    ///
    /// Delivery is best effort: if the target terminates before the event
    /// is due, the event is silently dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the process is unknown or already terminated,
    /// or if the delivery time exceeds [`SimTime::MAX`].
    ///
    pub fn signal_event(&mut self, event: E, pid: ProcessId, delay: Duration) -> Result<(), SimError> {
        if self.record(pid)?.terminated {
            return Err(SimError::AlreadyTerminated(pid));
        }

        let time = self
            .clock()
            .checked_add(delay)
            .ok_or(SimError::TimeOverflow(pid))?;
        self.schedule_at(time, Action::Event(pid, event));
        Ok(())
    }

    ///
    /// Sets a timeout for the current process, scheduling
    /// [`Process::process_timeout`] `delay` after the current [`clock`](Sim::clock).
    ///
    /// # Panics
    ///
    /// This function panics if no process is currently dispatching, or if
    /// the timeout would be due after [`SimTime::MAX`].
    ///
    pub fn set_timeout(&mut self, delay: Duration) {
        assert!(
            !self.current_process.is_null(),
            "Sim::set_timeout can only be used while a process is dispatching"
        );

        let Some(time) = self.clock().checked_add(delay) else {
            panic!("Sim::set_timeout delay of {delay:?} overflows the simulation time");
        };
        self.schedule_at(time, Action::Timeout(self.current_process));
    }

    ///
    /// Advances the execution time of the current process.
    ///
    /// This specifies the duration of the current action, or of certain steps
    /// within it. Events and timeouts scheduled afterwards by the same callback
    /// are relative to the advanced clock, and a sequential process stays busy
    /// until the advanced clock.
    ///
    /// Does nothing unless the simulation is running.
    ///
    pub fn advance_delay(&mut self, delay: Duration) {
        if !self.running {
            return;
        }

        let Some(record) = self
            .current_process
            .index()
            .and_then(|i| self.processes.get_mut(i))
        else {
            return;
        };

        record.action_time += delay;
        self.current_delay += delay;
    }

    ///
    /// Returns the currently dispatching process, or
    /// [`ProcessId::NULL`] outside of a dispatch.
    ///
    #[must_use]
    pub fn this_process(&self) -> ProcessId {
        self.current_process
    }

    ///
    /// Returns the current virtual time for the current process,
    /// including any delay it has advanced.
    ///
    #[must_use]
    pub fn clock(&self) -> SimTime {
        self.current_time + self.current_delay
    }

    ///
    /// Stops the execution of the simulation. The run ends before the
    /// next action is taken from the schedule.
    ///
    pub fn stop_simulation(&mut self) {
        self.running = false;
    }

    ///
    /// Resets the scheduler, making it available for a completely
    /// new simulation.
    ///
    /// All scheduled actions are deleted together with their events, and all
    /// processes are dropped. Process ids returned previously are invalidated.
    ///
    pub fn clear(&mut self) {
        self.running = false;
        self.current_time = SimTime::ZERO;
        self.current_delay = Duration::ZERO;
        self.current_process = ProcessId::NULL;

        self.processes.clear();
        self.schedule.clear();
        self.profiler = Profiler::default();
        self.epoch += 1;
    }

    /// Runs the simulation until the schedule is empty,
    /// [`stop_simulation`](Sim::stop_simulation) is called or a limit applies.
    ///
    /// Calling this function from within a process callback has
    /// no effect and returns [`RunResult::Reentrant`].
    pub fn run_simulation(&mut self) -> RunResult {
        if self.locked {
            debug!("simulation is already running, ignoring nested run");
            return RunResult::Reentrant;
        }

        self.locked = true;
        self.running = true;

        if !self.quiet {
            info!(
                processes = self.processes.len(),
                pending = self.schedule.len(),
                limit = %self.limit,
                "simulation starting"
            );
        }
        self.profiler.start();

        let mut itr = 0;
        while self.running {
            let Some(time) = self.schedule.peek_time() else {
                break;
            };

            if self.limit.applies(itr + 1, time) {
                break;
            }

            let Some((time, action)) = self.schedule.fetch_next() else {
                break;
            };

            itr += 1;
            self.profiler.event_count += 1;

            // Let this be the only position where the current time is changed
            self.current_time = time;
            self.dispatch(action);
        }

        self.running = false;
        self.locked = false;
        self.profiler.finish();

        self.finish(itr)
    }

    fn finish(&self, itr: usize) -> RunResult {
        let time = self.current_time;

        let result = if self.schedule.is_empty() && itr == 0 {
            RunResult::EmptySimulation { time }
        } else if self.schedule.is_empty() {
            RunResult::Finished {
                time,
                event_count: itr,
            }
        } else {
            RunResult::PrematureAbort {
                time,
                event_count: itr,
                active_events: self.schedule.len(),
            }
        };

        if !self.quiet {
            match result {
                RunResult::EmptySimulation { .. } => info!("empty simulation"),
                RunResult::Finished { .. } => info!(
                    event_count = itr,
                    dropped = self.profiler.dropped,
                    elapsed = ?self.profiler.duration,
                    "simulation ended at {time}"
                ),
                _ => info!(
                    event_count = itr,
                    active_events = self.schedule.len(),
                    "simulation ended prematurely at {time}"
                ),
            }
        }

        result
    }

    /// Handles one action taken from the schedule at the current time.
    fn dispatch(&mut self, action: Action<E>) {
        let pid = action.target();
        let kind = action.kind();
        let time = self.current_time;

        let Some(index) = pid.index().filter(|i| *i < self.processes.len()) else {
            trace!(%pid, action = %kind, "dropped action of unknown process");
            self.profiler.dropped += 1;
            return;
        };

        let record = &mut self.processes[index];
        if record.terminated {
            trace!(%pid, action = %kind, "dropped action of terminated process");
            self.profiler.dropped += 1;
            return;
        }

        if record.mode.is_sequential() && time < record.busy_until {
            if record.mode.is_queueing() {
                let available_at = record.busy_until;
                trace!(%pid, action = %kind, %available_at, "deferred action of busy process");
                self.profiler.deferred += 1;
                self.schedule_at(available_at, action);
            } else {
                trace!(%pid, action = %kind, "dropped action of busy process");
                self.profiler.dropped += 1;
            }
            return;
        }

        // Nested runs are rejected, so a process is never dispatched twice at once.
        let Some(mut handle) = record.handle.take() else {
            unreachable!("process {pid} is already dispatching");
        };

        let epoch = self.epoch;
        self.current_delay = Duration::ZERO;
        self.current_process = pid;
        self.profiler.dispatched += 1;

        {
            let span = info_span!("dispatch", %pid, %time, action = %kind);
            let _guard = span.enter();
            match action {
                Action::Init(_) => handle.init(self),
                Action::Event(_, event) => handle.process_event(self, event),
                Action::Timeout(_) => handle.process_timeout(self),
                Action::Stop(_) => handle.stop(self),
            }
        }

        // A `clear` from within the callback dropped the registry.
        if self.epoch == epoch {
            let clock = self.clock();
            let record = &mut self.processes[index];
            record.handle = Some(handle);

            if kind == ActionKind::Stop {
                record.terminated = true;
            }
            if record.mode.is_sequential() {
                record.busy_until = clock;
            }
        }

        self.current_delay = Duration::ZERO;
        self.current_process = ProcessId::NULL;
    }

    fn schedule_at(&mut self, time: SimTime, action: Action<E>) {
        assert!(time >= self.current_time, "Sorry we cannot timetravel yet");

        self.profiler.scheduled += 1;
        self.schedule.add(time, action);
    }

    fn record(&self, pid: ProcessId) -> Result<&ProcessRecord<E>, SimError> {
        pid.index()
            .and_then(|i| self.processes.get(i))
            .ok_or(SimError::UnknownProcess(pid))
    }
}

// # Introspection
impl<E> Sim<E> {
    ///
    /// Returns the number of processes created since the last [`clear`](Sim::clear).
    ///
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    ///
    /// Returns whether the process was terminated, `None` if the id is unknown.
    ///
    #[must_use]
    pub fn is_terminated(&self, pid: ProcessId) -> Option<bool> {
        self.record(pid).ok().map(|r| r.terminated)
    }

    ///
    /// Returns the total delay advanced by the process over its lifetime.
    ///
    #[must_use]
    pub fn action_time(&self, pid: ProcessId) -> Option<Duration> {
        self.record(pid).ok().map(|r| r.action_time)
    }

    ///
    /// Returns the virtual time a sequential process is busy through.
    ///
    #[must_use]
    pub fn busy_until(&self, pid: ProcessId) -> Option<SimTime> {
        self.record(pid).ok().map(|r| r.busy_until)
    }

    ///
    /// Returns the execution flags of the process.
    ///
    #[must_use]
    pub fn mode(&self, pid: ProcessId) -> Option<Mode> {
        self.record(pid).ok().map(|r| r.mode)
    }

    ///
    /// Returns the number of actions currently scheduled.
    ///
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.schedule.len()
    }

    ///
    /// Returns whether a run is in progress and has not been stopped.
    ///
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    ///
    /// Returns the action counters of this scheduler.
    ///
    #[must_use]
    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    ///
    /// Returns the limit applied to each run.
    ///
    #[must_use]
    pub fn limit(&self) -> &RuntimeLimit {
        &self.limit
    }
}

// # Randomness
impl<E> Sim<E> {
    ///
    /// Returns the random number generator of this scheduler.
    ///
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    ///
    /// Generates a random instance of type T with a standard distribution.
    ///
    pub fn random<T>(&mut self) -> T
    where
        StandardUniform: Distribution<T>,
    {
        self.rng.random::<T>()
    }

    ///
    /// Generates a random instance of type T with a distribution
    /// of type D.
    ///
    pub fn sample<T, D>(&mut self, distr: D) -> T
    where
        D: Distribution<T>,
    {
        self.rng.sample::<T, D>(distr)
    }
}

impl<E> Default for Sim<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for Sim<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("clock", &self.clock())
            .field("current_process", &self.current_process)
            .field("running", &self.running)
            .field("processes", &self.processes)
            .field("schedule", &self.schedule)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<E> Display for Sim<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sim<{}> {{ clock: {} processes: {} dispatched: {} enqueued: {} }}",
            type_name::<E>(),
            self.clock(),
            self.processes.len(),
            self.profiler.dispatched,
            self.schedule.len()
        )
    }
}
