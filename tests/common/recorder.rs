#![allow(unused)]

use ssim::prelude::*;
use std::{cell::RefCell, rc::Rc};

/// One dispatched callback, as seen by the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: SimTime,
    pub pid: ProcessId,
    pub kind: ActionKind,
    pub payload: Option<u32>,
}

pub type Journal = Rc<RefCell<Vec<Entry>>>;

pub type Hook = Box<dyn FnMut(&mut Sim<u32>, ActionKind, Option<u32>)>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn secs(secs: u64) -> SimTime {
    SimTime::from_duration(Duration::from_secs(secs))
}

/// A process that writes every dispatch into a shared journal, and then
/// runs an optional hook with access to the scheduler.
pub struct Recorder {
    journal: Journal,
    hook: Option<Hook>,
}

impl Recorder {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
            hook: None,
        }
    }

    pub fn with_hook(
        journal: &Journal,
        hook: impl FnMut(&mut Sim<u32>, ActionKind, Option<u32>) + 'static,
    ) -> Self {
        Self {
            journal: Rc::clone(journal),
            hook: Some(Box::new(hook)),
        }
    }

    fn record(&mut self, sim: &mut Sim<u32>, kind: ActionKind, payload: Option<u32>) {
        self.journal.borrow_mut().push(Entry {
            time: sim.clock(),
            pid: sim.this_process(),
            kind,
            payload,
        });
        if let Some(hook) = &mut self.hook {
            hook(sim, kind, payload);
        }
    }
}

impl Process<u32> for Recorder {
    fn init(&mut self, sim: &mut Sim<u32>) {
        self.record(sim, ActionKind::Init, None);
    }

    fn process_event(&mut self, sim: &mut Sim<u32>, event: u32) {
        self.record(sim, ActionKind::Event, Some(event));
    }

    fn process_timeout(&mut self, sim: &mut Sim<u32>) {
        self.record(sim, ActionKind::Timeout, None);
    }

    fn stop(&mut self, sim: &mut Sim<u32>) {
        self.record(sim, ActionKind::Stop, None);
    }
}

/// The payloads of all event dispatches, in dispatch order.
pub fn payloads(journal: &Journal) -> Vec<u32> {
    journal.borrow().iter().filter_map(|e| e.payload).collect()
}

/// `(kind, payload, time)` of all dispatches, in dispatch order.
pub fn trace(journal: &Journal) -> Vec<(ActionKind, Option<u32>, SimTime)> {
    journal
        .borrow()
        .iter()
        .map(|e| (e.kind, e.payload, e.time))
        .collect()
}

pub fn sim() -> Sim<u32> {
    Builder::seeded(123).quiet().build()
}
