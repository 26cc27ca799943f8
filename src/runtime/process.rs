use crate::runtime::Sim;
use crate::time::{Duration, SimTime};
use std::{
    cell::RefCell,
    fmt::{Debug, Display},
    ops::{BitOr, BitOrAssign},
    rc::Rc,
};

///
/// A scheduler unique identifier of a simulated process.
///
/// Identifiers are issued sequentially by [`Sim::create_process`],
/// starting at `1`. The raw value `0` is reserved as
/// [`ProcessId::NULL`], the "no process" sentinel.
///
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProcessId(usize);

impl ProcessId {
    /// The id that never refers to a process.
    pub const NULL: ProcessId = ProcessId(0);

    /// Creates a process id from its raw value.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw value of the id.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Whether this id is the [`ProcessId::NULL`] sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Index into the process registry, `None` for the sentinel.
    pub(crate) fn index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl Debug for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "ProcessId(NULL)")
        } else {
            write!(f, "ProcessId({})", self.0)
        }
    }
}

impl Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<usize> for ProcessId {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

///
/// Execution flags of a process, fixed at creation.
///
/// By default processes are [`CONCURRENT`](Mode::CONCURRENT): their actions
/// are considered reentrant and may overlap in virtual time. A
/// [`SEQUENTIAL`](Mode::SEQUENTIAL) process handles one action at a time, and
/// actions arriving while it is busy are dropped, unless
/// [`QUEUEING`](Mode::QUEUEING) is set as well, in which case they are deferred
/// until the process becomes available.
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Mode(u8);

impl Mode {
    /// No flags.
    pub const CONCURRENT: Mode = Mode(0x00);
    /// Process one action at a time with respect to virtual time.
    pub const SEQUENTIAL: Mode = Mode(0x02);
    /// Defer actions that arrive while busy. Only meaningful
    /// together with [`Mode::SEQUENTIAL`].
    pub const QUEUEING: Mode = Mode(0x04);

    /// Returns `true` if all flags in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the sequential flag is set.
    #[must_use]
    pub const fn is_sequential(self) -> bool {
        self.contains(Self::SEQUENTIAL)
    }

    /// Whether busy-time actions are deferred instead of dropped.
    #[must_use]
    pub const fn is_queueing(self) -> bool {
        self.contains(Self::SEQUENTIAL) && self.contains(Self::QUEUEING)
    }

    /// The raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Mode {
    type Output = Mode;
    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

impl Debug for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.is_sequential(), self.contains(Self::QUEUEING)) {
            (false, false) => write!(f, "CONCURRENT"),
            (true, false) => write!(f, "SEQUENTIAL"),
            (false, true) => write!(f, "QUEUEING"),
            (true, true) => write!(f, "SEQUENTIAL | QUEUEING"),
        }
    }
}

///
/// The capability set of a simulated process.
///
/// The scheduler calls these methods when the matching action is
/// dispatched. Every method has a no-op default, so implementors only
/// override what they react to. All methods get mutable access to the
/// scheduler, which is how a process signals events, sets timeouts or
/// advances its own action delay.
///
/// # Examples
///
/// ```
/// use ssim::prelude::*;
///
/// struct Ticker { ticks: usize }
///
/// impl Process<()> for Ticker {
///     fn init(&mut self, sim: &mut Sim<()>) {
///         sim.set_timeout(Duration::from_secs(1));
///     }
///
///     fn process_timeout(&mut self, sim: &mut Sim<()>) {
///         self.ticks += 1;
///         if self.ticks < 3 {
///             sim.set_timeout(Duration::from_secs(1));
///         }
///     }
/// }
///
/// let mut sim = Builder::seeded(1).quiet().build::<()>();
/// sim.create_process(Ticker { ticks: 0 }, Mode::CONCURRENT);
/// sim.run_simulation();
/// assert_eq!(sim.clock(), SimTime::from(3.0));
/// ```
pub trait Process<E> {
    /// Action when the process is created. Dispatched before any
    /// event, timeout or stop directed at this process.
    #[allow(unused_variables)]
    fn init(&mut self, sim: &mut Sim<E>) {}

    /// Action executed in response to an event signaled to this process.
    ///
    /// The duration of the action is zero, unless it is stretched by
    /// calling [`Sim::advance_delay`].
    #[allow(unused_variables)]
    fn process_event(&mut self, sim: &mut Sim<E>, event: E) {}

    /// Action executed in response to a timeout set by this process
    /// through [`Sim::set_timeout`].
    #[allow(unused_variables)]
    fn process_timeout(&mut self, sim: &mut Sim<E>) {}

    /// Executed when the process is explicitly stopped through
    /// [`Sim::stop_process`]. No action is dispatched to this process
    /// afterwards.
    #[allow(unused_variables)]
    fn stop(&mut self, sim: &mut Sim<E>) {}
}

/// An idle process that ignores all actions.
impl<E> Process<E> for () {}

/// A shared process. The host program may keep a clone of the handle
/// to inspect the process state between or after runs.
///
/// The handle is borrowed mutably for the duration of each callback,
/// so it must not be borrowed elsewhere while the simulation runs.
impl<E, P> Process<E> for Rc<RefCell<P>>
where
    P: Process<E>,
{
    fn init(&mut self, sim: &mut Sim<E>) {
        self.borrow_mut().init(sim);
    }

    fn process_event(&mut self, sim: &mut Sim<E>, event: E) {
        self.borrow_mut().process_event(sim, event);
    }

    fn process_timeout(&mut self, sim: &mut Sim<E>) {
        self.borrow_mut().process_timeout(sim);
    }

    fn stop(&mut self, sim: &mut Sim<E>) {
        self.borrow_mut().stop(sim);
    }
}

///
/// A process that remembers the id it was activated under.
///
/// See [`Sim::activate`].
///
pub trait Activate<E>: Process<E> {
    /// The id this process was activated with, or [`ProcessId::NULL`].
    fn pid(&self) -> ProcessId;

    /// Stores the id issued on activation.
    fn set_pid(&mut self, pid: ProcessId);
}

/// Scheduler-side bookkeeping of a registered process.
pub(crate) struct ProcessRecord<E> {
    /// `None` only while one of its callbacks is executing.
    pub(crate) handle: Option<Box<dyn Process<E>>>,
    pub(crate) mode: Mode,
    pub(crate) terminated: bool,
    pub(crate) busy_until: SimTime,
    pub(crate) action_time: Duration,
}

impl<E> ProcessRecord<E> {
    pub(crate) fn new(handle: Box<dyn Process<E>>, mode: Mode) -> Self {
        Self {
            handle: Some(handle),
            mode,
            terminated: false,
            busy_until: SimTime::ZERO,
            action_time: Duration::ZERO,
        }
    }
}

impl<E> Debug for ProcessRecord<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRecord")
            .field("mode", &self.mode)
            .field("terminated", &self.terminated)
            .field("busy_until", &self.busy_until)
            .field("action_time", &self.action_time)
            .finish_non_exhaustive()
    }
}
