#![allow(clippy::needless_doctest_main)]
//!
//! A discrete event simulator.
//!
//! `ssim` advances a virtual clock by executing a time-ordered schedule of
//! actions against a set of simulated processes. Each action may itself
//! schedule further actions at future virtual times.
//!
//! # Building a simulation
//!
//! Processes implement [`Process`](crate::runtime::Process) for some event
//! payload type. They are registered with a [`Sim`](crate::runtime::Sim),
//! which first dispatches their `init` callback, and then every event or
//! timeout directed at them, in virtual time order.
//!
//! ```
//! use ssim::prelude::*;
//!
//! #[derive(Debug)]
//! struct Counter(u32);
//!
//! struct Node {
//!     peer: ProcessId,
//!     last_seen: u32,
//! }
//!
//! impl Process<Counter> for Node {
//!     fn init(&mut self, sim: &mut Sim<Counter>) {
//!         if sim.this_process() == ProcessId::new(1) {
//!             let _ = sim.signal_event(Counter(0), self.peer, Duration::from_secs(1));
//!         }
//!     }
//!
//!     fn process_event(&mut self, sim: &mut Sim<Counter>, Counter(n): Counter) {
//!         self.last_seen = n;
//!         if n < 10 {
//!             let _ = sim.signal_event(Counter(n + 1), self.peer, Duration::from_secs(1));
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let mut sim = Builder::seeded(123).quiet().build();
//!     sim.create_process(Node { peer: ProcessId::new(2), last_seen: 0 }, Mode::CONCURRENT);
//!     sim.create_process(Node { peer: ProcessId::new(1), last_seen: 0 }, Mode::CONCURRENT);
//!
//!     let result = sim.run_simulation();
//!     assert_eq!(result.time(), Some(SimTime::from(11.0)));
//! }
//! ```
//!
//! Process modes decide how a process copes with overlapping actions, see
//! [`Mode`](crate::runtime::Mode). Logging goes through [`tracing`](::tracing);
//! [`crate::tracing`] provides a formatter that shows the simulation context
//! of each message.

pub mod prelude;

pub mod runtime;
pub mod time;
pub mod tracing;
