use crate::time::SimTime;
use std::{fmt::Display, mem};

///
/// A composed limit that terminates a run of the scheduler
/// before its schedule is exhausted.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RuntimeLimit {
    /// A unbounded run. A run with this limit will
    /// only finish once all actions are handled and no new
    /// actions have been scheduled.
    #[default]
    None,

    /// A bound based on the number of actions taken from the schedule,
    /// including those that were dropped or deferred. The run stops
    /// before the action that would exceed the bound.
    EventCount(usize),

    /// A bound based on the virtual time. A run with this bound stops
    /// once no actions scheduled at or before the given time are left.
    SimTime(SimTime),

    /// This bound combines two other bounds with a logical AND.
    CombinedAnd(Box<RuntimeLimit>, Box<RuntimeLimit>),

    /// This bound combines two other bounds with a logical OR.
    CombinedOr(Box<RuntimeLimit>, Box<RuntimeLimit>),
}

impl RuntimeLimit {
    /// Whether the `itr_count`-th action, due at `time`, must not be taken.
    pub(crate) fn applies(&self, itr_count: usize, time: SimTime) -> bool {
        match self {
            Self::None => false,

            Self::EventCount(e) => itr_count > *e,
            Self::SimTime(t) => time > *t,

            Self::CombinedAnd(lhs, rhs) => {
                lhs.applies(itr_count, time) && rhs.applies(itr_count, time)
            }
            Self::CombinedOr(lhs, rhs) => {
                lhs.applies(itr_count, time) || rhs.applies(itr_count, time)
            }
        }
    }

    /// Adds another limit, combining both with a logical OR.
    pub(crate) fn add(&mut self, limit: RuntimeLimit) {
        if matches!(self, Self::None) {
            *self = limit;
        } else {
            let other = mem::take(self);
            *self = Self::CombinedOr(Box::new(other), Box::new(limit));
        }
    }
}

impl Display for RuntimeLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),

            Self::EventCount(e) => write!(f, "MaxEventCount({e})"),
            Self::SimTime(t) => write!(f, "MaxSimTime({t})"),

            Self::CombinedAnd(lhs, rhs) => write!(f, "{lhs} and {rhs}"),
            Self::CombinedOr(lhs, rhs) => write!(f, "{lhs} or {rhs}"),
        }
    }
}
