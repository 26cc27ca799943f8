use ssim::prelude::*;
use std::{cell::RefCell, rc::Rc};

#[path = "common/recorder.rs"]
mod recorder;
use recorder::*;

#[test]
fn no_dispatch_after_stop() {
    let mut sim = sim();
    let journal = journal();
    let pid = sim.create_process(
        Recorder::with_hook(&journal, |sim, _, payload| {
            if payload == Some(1) {
                sim.stop_this_process().unwrap();
            }
        }),
        Mode::CONCURRENT,
    );
    sim.signal_event(1, pid, Duration::from_secs(1)).unwrap();
    sim.signal_event(2, pid, Duration::from_secs(1)).unwrap();
    sim.signal_event(3, pid, Duration::from_secs(2)).unwrap();

    let result = sim.run_simulation();
    assert_eq!(
        result,
        RunResult::Finished {
            time: secs(2),
            event_count: 5
        }
    );

    // event 2 was queued before the stop at the same time
    assert_eq!(
        trace(&journal),
        [
            (ActionKind::Init, None, SimTime::ZERO),
            (ActionKind::Event, Some(1), secs(1)),
            (ActionKind::Event, Some(2), secs(1)),
            (ActionKind::Stop, None, secs(1)),
        ]
    );
    assert_eq!(sim.profiler().dropped, 1);
    assert_eq!(sim.is_terminated(pid), Some(true));

    assert_eq!(sim.stop_process(pid), Err(SimError::AlreadyTerminated(pid)));
    assert_eq!(
        sim.signal_event(4, pid, Duration::ZERO),
        Err(SimError::AlreadyTerminated(pid))
    );
    assert_eq!(sim.pending_actions(), 0);
}

#[test]
fn stop_from_timeout() {
    let mut sim = sim();
    let journal = journal();
    sim.create_process(
        Recorder::with_hook(&journal, |sim, kind, _| match kind {
            ActionKind::Init => sim.set_timeout(Duration::from_secs(3)),
            ActionKind::Timeout => sim.stop_this_process().unwrap(),
            _ => {}
        }),
        Mode::CONCURRENT,
    );
    sim.run_simulation();

    assert_eq!(
        trace(&journal),
        [
            (ActionKind::Init, None, SimTime::ZERO),
            (ActionKind::Timeout, None, secs(3)),
            (ActionKind::Stop, None, secs(3)),
        ]
    );
}

#[test]
fn stop_twice_before_dispatch() {
    let mut sim = sim();
    let journal = journal();
    let pid = sim.create_process(Recorder::new(&journal), Mode::CONCURRENT);

    assert_eq!(sim.stop_process(pid), Ok(()));
    assert_eq!(sim.stop_process(pid), Ok(()));
    sim.run_simulation();

    let kinds = journal.borrow().iter().map(|e| e.kind).collect::<Vec<_>>();
    assert_eq!(kinds, [ActionKind::Init, ActionKind::Stop]);
    assert_eq!(sim.profiler().dropped, 1);
}

#[test]
fn stop_of_other_process() {
    let mut sim = sim();
    let journal = journal();
    let victim = sim.create_process(Recorder::new(&journal), Mode::CONCURRENT);
    sim.create_process(
        Recorder::with_hook(&journal, move |sim, kind, _| {
            if kind == ActionKind::Init {
                sim.stop_process(victim).unwrap();
            }
        }),
        Mode::CONCURRENT,
    );
    sim.run_simulation();

    let entries = journal
        .borrow()
        .iter()
        .map(|e| (e.pid.raw(), e.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        entries,
        [
            (1, ActionKind::Init),
            (2, ActionKind::Init),
            (1, ActionKind::Stop),
        ]
    );
    assert_eq!(sim.is_terminated(victim), Some(true));
    assert_eq!(sim.is_terminated(ProcessId::new(2)), Some(false));
}

#[test]
fn sequential_self_stop_after_advance_is_dropped() {
    let mut sim = sim();
    let journal = journal();
    let pid = sim.create_process(
        Recorder::with_hook(&journal, |sim, kind, _| {
            if kind == ActionKind::Init {
                sim.advance_delay(Duration::from_secs(5));
                sim.stop_this_process().unwrap();
            }
        }),
        Mode::SEQUENTIAL,
    );
    sim.run_simulation();

    // The stop is due at the start of the busy period and gets dropped.
    assert_eq!(trace(&journal), [(ActionKind::Init, None, SimTime::ZERO)]);
    assert_eq!(sim.is_terminated(pid), Some(false));
    assert_eq!(sim.profiler().dropped, 1);
}

#[test]
fn unknown_processes() {
    let mut sim = sim();
    let unknown = ProcessId::new(5);

    assert_eq!(
        sim.signal_event(1, unknown, Duration::ZERO),
        Err(SimError::UnknownProcess(unknown))
    );
    assert_eq!(sim.stop_process(unknown), Err(SimError::UnknownProcess(unknown)));
    assert_eq!(sim.is_terminated(unknown), None);
    assert_eq!(sim.mode(unknown), None);

    let err = sim.stop_this_process().unwrap_err();
    assert_eq!(err, SimError::UnknownProcess(ProcessId::NULL));
    assert_eq!(err.to_string(), "no process is dispatching");
    assert_eq!(
        sim.signal_event(1, ProcessId::NULL, Duration::ZERO),
        Err(SimError::UnknownProcess(ProcessId::NULL))
    );
    assert_eq!(sim.pending_actions(), 0);
}

#[derive(Default)]
struct Tracked {
    pid: ProcessId,
    inits: usize,
    events: Vec<u32>,
}

impl Process<u32> for Tracked {
    fn init(&mut self, sim: &mut Sim<u32>) {
        assert_eq!(sim.this_process(), self.pid);
        self.inits += 1;
    }

    fn process_event(&mut self, _: &mut Sim<u32>, event: u32) {
        self.events.push(event);
    }
}

impl Activate<u32> for Tracked {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn set_pid(&mut self, pid: ProcessId) {
        self.pid = pid;
    }
}

#[test]
fn activate_once() {
    let mut sim = sim();
    let tracked = Rc::new(RefCell::new(Tracked::default()));

    let pid = sim.activate(&tracked, Mode::SEQUENTIAL);
    assert_eq!(pid, Some(ProcessId::new(1)));
    assert_eq!(sim.activate(&tracked, Mode::SEQUENTIAL), None);
    assert_eq!(sim.process_count(), 1);

    sim.signal_event(4, ProcessId::new(1), Duration::from_secs(1))
        .unwrap();
    sim.signal_event(2, ProcessId::new(1), Duration::from_secs(2))
        .unwrap();
    sim.run_simulation();

    // state is shared with the host
    let tracked = tracked.borrow();
    assert_eq!(tracked.pid, ProcessId::new(1));
    assert_eq!(tracked.inits, 1);
    assert_eq!(tracked.events, [4, 2]);
}

#[test]
fn clear_within_callback() {
    let mut sim = sim();
    let journal = journal();
    let pid = sim.create_process(
        Recorder::with_hook(&journal, |sim, _, payload| {
            if payload == Some(1) {
                sim.clear();
            }
        }),
        Mode::SEQUENTIAL,
    );
    sim.signal_event(1, pid, Duration::from_secs(1)).unwrap();
    sim.signal_event(2, pid, Duration::from_secs(2)).unwrap();

    let result = sim.run_simulation();
    assert_eq!(
        result,
        RunResult::Finished {
            time: SimTime::ZERO,
            event_count: 2
        }
    );
    assert_eq!(payloads(&journal), [1]);
    assert_eq!(sim.process_count(), 0);
    assert_eq!(sim.pending_actions(), 0);
    assert_eq!(sim.this_process(), ProcessId::NULL);

    // usable again afterwards
    let pid = sim.create_process(Recorder::new(&journal), Mode::CONCURRENT);
    assert_eq!(pid, ProcessId::new(1));
    assert_eq!(sim.run_simulation().event_count(), 1);
}

#[test]
fn create_within_callback() {
    let mut sim = sim();
    let journal = journal();
    let inner = Rc::clone(&journal);
    sim.create_process(
        Recorder::with_hook(&journal, move |sim, kind, _| {
            if kind == ActionKind::Init {
                let child = sim.create_process(Recorder::new(&inner), Mode::CONCURRENT);
                sim.signal_event(7, child, Duration::ZERO).unwrap();
            }
        }),
        Mode::CONCURRENT,
    );
    sim.run_simulation();

    let entries = journal
        .borrow()
        .iter()
        .map(|e| (e.pid.raw(), e.kind, e.payload))
        .collect::<Vec<_>>();
    assert_eq!(
        entries,
        [
            (1, ActionKind::Init, None),
            (2, ActionKind::Init, None),
            (2, ActionKind::Event, Some(7)),
        ]
    );
}

#[test]
fn idle_process() {
    let mut sim = sim();
    let pid = sim.create_process((), Mode::SEQUENTIAL);
    sim.signal_event(1, pid, Duration::from_secs(1)).unwrap();

    assert_eq!(
        sim.run_simulation(),
        RunResult::Finished {
            time: secs(1),
            event_count: 2
        }
    );
    assert_eq!(sim.profiler().dispatched, 2);
}

#[test]
fn event_beyond_max_time() {
    let mut sim = sim();
    let journal = journal();
    let outcome = Rc::new(RefCell::new(None));

    let observed = Rc::clone(&outcome);
    let pid = sim.create_process(
        Recorder::with_hook(&journal, move |sim, kind, _| match kind {
            ActionKind::Init => sim.set_timeout(Duration::from_secs(5)),
            ActionKind::Timeout => {
                let me = sim.this_process();
                *observed.borrow_mut() = Some(sim.signal_event(1, me, Duration::MAX));
            }
            _ => {}
        }),
        Mode::CONCURRENT,
    );

    let result = sim.run_simulation();
    assert_eq!(*outcome.borrow(), Some(Err(SimError::TimeOverflow(pid))));
    assert_eq!(
        result,
        RunResult::Finished {
            time: secs(5),
            event_count: 2
        }
    );
    assert_eq!(payloads(&journal), Vec::<u32>::new());

    // the largest representable delay still fits at time zero
    let mut sim = recorder::sim();
    let pid = sim.create_process((), Mode::CONCURRENT);
    assert_eq!(sim.signal_event(1, pid, Duration::MAX), Ok(()));
}

#[test]
#[should_panic(expected = "overflows the simulation time")]
fn timeout_beyond_max_time() {
    let mut sim = sim();
    let journal = journal();
    sim.create_process(
        Recorder::with_hook(&journal, |sim, kind, _| match kind {
            ActionKind::Init => sim.set_timeout(Duration::from_secs(5)),
            ActionKind::Timeout => sim.set_timeout(Duration::MAX),
            _ => {}
        }),
        Mode::CONCURRENT,
    );
    sim.run_simulation();
}
