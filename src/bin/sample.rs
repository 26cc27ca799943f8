//! Two processes bounce a counter back and forth until it reaches 10,
//! while each of them stops itself once a random timeout fires.
//!
//! Usage: `sample [SEED]`

use rand::Rng;
use ssim::prelude::*;
use tracing::{info, warn};

const BOUNCE_DELAY: Duration = Duration::from_secs(1000);
const BOUNCE_LIMIT: u32 = 10;

#[derive(Debug)]
struct Counter {
    counter: u32,
    sender: ProcessId,
}

struct Node {
    peer: ProcessId,
    starts: bool,
}

impl Process<Counter> for Node {
    fn init(&mut self, sim: &mut Sim<Counter>) {
        if self.starts {
            let me = sim.this_process();
            info!("process {me} creating the counter and sending it to process {}", self.peer);
            let event = Counter {
                counter: 0,
                sender: me,
            };
            if let Err(e) = sim.signal_event(event, self.peer, BOUNCE_DELAY) {
                warn!("cannot start the exchange: {e}");
            }
        }

        let timeout = sim.rng().random_range(1..=10_000);
        sim.set_timeout(Duration::from_secs(timeout));
    }

    fn process_event(&mut self, sim: &mut Sim<Counter>, mut event: Counter) {
        info!("caught the counter: value is {}", event.counter);

        let sender = event.sender;
        event.counter += 1;
        event.sender = sim.this_process();
        if event.counter < BOUNCE_LIMIT {
            info!("incrementing and bouncing the counter back");
            if let Err(e) = sim.signal_event(event, sender, BOUNCE_DELAY) {
                warn!("cannot bounce the counter: {e}");
            }
        }
    }

    fn process_timeout(&mut self, sim: &mut Sim<Counter>) {
        info!("caught a timeout, stopping");
        if let Err(e) = sim.stop_this_process() {
            warn!("cannot stop: {e}");
        }
    }

    fn stop(&mut self, sim: &mut Sim<Counter>) {
        info!("process {} stopping at {}", sim.this_process(), sim.clock());
    }
}

fn main() {
    ssim::tracing::init();

    let builder = match std::env::args().nth(1) {
        Some(seed) => match seed.parse::<u64>() {
            Ok(seed) => Builder::seeded(seed),
            Err(e) => {
                eprintln!("invalid seed '{seed}': {e}");
                std::process::exit(2);
            }
        },
        None => Builder::new(),
    };

    let mut sim = builder.build::<Counter>();

    // The first node starts the exchange with the second one.
    let first = ProcessId::new(sim.process_count() + 1);
    let second = ProcessId::new(first.raw() + 1);
    sim.create_process(
        Node {
            peer: second,
            starts: true,
        },
        Mode::CONCURRENT,
    );
    sim.create_process(
        Node {
            peer: first,
            starts: false,
        },
        Mode::CONCURRENT,
    );

    // Terminates once the schedule has been drained.
    let result = sim.run_simulation();
    info!(?result, "complete");
}
