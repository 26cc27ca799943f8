use std::fmt::Debug;

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::time::SimTime;

use super::{RuntimeLimit, Sim};

/// A builder for a scheduler instance.
///
/// # Examples
///
/// ```
/// use ssim::prelude::*;
///
/// let sim: Sim<String> = Builder::seeded(42)
///     .quiet()
///     .max_time(SimTime::from(100.0))
///     .build();
///
/// assert_eq!(sim.process_count(), 0);
/// ```
#[must_use]
pub struct Builder {
    pub(super) quiet: bool,
    pub(super) rng: Box<dyn RngCore>,
    pub(super) limit: RuntimeLimit,
}

impl Builder {
    /// Creates a new unconfigured builder, with an RNG seeded
    /// from the operating system.
    pub fn new() -> Builder {
        Builder {
            quiet: false,
            rng: Box::new(StdRng::from_os_rng()),
            limit: RuntimeLimit::None,
        }
    }

    /// Creates a `Builder` with a static seeded RNG.
    pub fn seeded(seed: u64) -> Builder {
        Builder {
            quiet: false,
            rng: Box::new(StdRng::seed_from_u64(seed)),
            limit: RuntimeLimit::None,
        }
    }

    ///
    /// Suppresses the run summaries of the scheduler.
    ///
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    ///
    /// Bounds the number of actions taken from the schedule per run.
    ///
    pub fn max_itr(mut self, max_itr: usize) -> Self {
        self.limit.add(RuntimeLimit::EventCount(max_itr));
        self
    }

    ///
    /// Changes the maximum virtual time of a run (default: inf).
    ///
    pub fn max_time(mut self, max_time: SimTime) -> Self {
        self.limit.add(RuntimeLimit::SimTime(max_time));
        self
    }

    ///
    /// Adds a custom limit, combined with the limits set so far
    /// by a logical OR.
    ///
    pub fn limit(mut self, limit: RuntimeLimit) -> Self {
        self.limit.add(limit);
        self
    }

    ///
    /// Builds a new, empty [`Sim`] instance, carrying event
    /// payloads of type `E`.
    ///
    pub fn build<E>(self) -> Sim<E> {
        Sim::from_builder(self)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("quiet", &self.quiet)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
