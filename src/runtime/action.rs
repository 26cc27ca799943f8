use crate::runtime::ProcessId;
use crate::time::SimTime;
use std::{
    cmp,
    collections::BinaryHeap,
    fmt::{Debug, Display},
};

///
/// The kind of a scheduled action, without its payload.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Dispatches [`Process::init`](crate::runtime::Process::init).
    Init,
    /// Dispatches [`Process::process_event`](crate::runtime::Process::process_event).
    Event,
    /// Dispatches [`Process::process_timeout`](crate::runtime::Process::process_timeout).
    Timeout,
    /// Dispatches [`Process::stop`](crate::runtime::Process::stop) and terminates the process.
    Stop,
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Event => write!(f, "event"),
            Self::Timeout => write!(f, "timeout"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// A scheduled dispatch bound to a process.
pub(crate) enum Action<E> {
    Init(ProcessId),
    Event(ProcessId, E),
    Timeout(ProcessId),
    Stop(ProcessId),
}

impl<E> Action<E> {
    pub(crate) fn target(&self) -> ProcessId {
        match self {
            Self::Init(pid) | Self::Event(pid, _) | Self::Timeout(pid) | Self::Stop(pid) => *pid,
        }
    }

    pub(crate) fn kind(&self) -> ActionKind {
        match self {
            Self::Init(_) => ActionKind::Init,
            Self::Event(..) => ActionKind::Event,
            Self::Timeout(_) => ActionKind::Timeout,
            Self::Stop(_) => ActionKind::Stop,
        }
    }
}

impl<E> Debug for Action<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action::{} -> {}", self.kind(), self.target())
    }
}

///
/// A bin-heap node of a scheduled action.
///
/// Nodes are ordered by deadline first and enqueue sequence second,
/// so that actions due at the same time are handed out in FIFO order.
///
struct ActionNode<E> {
    time: SimTime,
    seq: u64,
    action: Action<E>,
}

impl<E> cmp::PartialEq for ActionNode<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<E> cmp::Eq for ActionNode<E> {}

impl<E> cmp::PartialOrd for ActionNode<E> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> cmp::Ord for ActionNode<E> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        // Inverted call should act as reverse
        (other.time, other.seq).cmp(&(self.time, self.seq))
    }
}

///
/// The time-ordered schedule of pending actions.
///
pub(crate) struct Schedule<E> {
    heap: BinaryHeap<ActionNode<E>>,
    seq: u64,
}

impl<E> Schedule<E> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(64),
            seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The deadline of the next action, if any.
    pub(crate) fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|node| node.time)
    }

    pub(crate) fn add(&mut self, time: SimTime, action: Action<E>) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(ActionNode { time, seq, action });
    }

    pub(crate) fn fetch_next(&mut self) -> Option<(SimTime, Action<E>)> {
        self.heap.pop().map(|node| (node.time, node.action))
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }
}

impl<E> Debug for Schedule<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schedule")
            .field("len", &self.len())
            .field("next", &self.peek_time())
            .finish()
    }
}
