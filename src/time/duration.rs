/// A Duration type to represent a span of virtual time.
pub use std::time::Duration;

use super::SimTime;
use std::ops::{Add, AddAssign};

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs)
            .expect("Overflow when adding Duration to SimTime")
    }
}

impl AddAssign<Duration> for SimTime {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

// f64

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: f64) -> Self::Output {
        self + Duration::from_secs_f64(rhs)
    }
}

impl AddAssign<f64> for SimTime {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition() {
        let mut time = SimTime::from_duration(Duration::from_secs(14));
        let duration = Duration::from_millis(3_500);

        assert_eq!(time + duration, SimTime::from_duration(Duration::from_millis(17_500)));
        time += duration;
        assert_eq!(time, SimTime::from_duration(Duration::from_millis(17_500)));

        let mut time = SimTime::ZERO;
        time += 2.5;
        assert_eq!(time, SimTime::from_duration(Duration::from_millis(2_500)));
    }

    #[test]
    #[should_panic(expected = "Overflow when adding Duration to SimTime")]
    fn addition_overflow() {
        let _ = SimTime::MAX + Duration::from_nanos(1);
    }
}
