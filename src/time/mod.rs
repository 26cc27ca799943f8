//!
//! Temporal quantification in a simulation context.
//!
//! Virtual time is owned by a [`Sim`](crate::runtime::Sim) instance and only
//! advances while the scheduler drains its queue. A [`SimTime`] is a point on
//! that virtual timeline, a [`Duration`] a non-negative span of it.
//!
//! # Examples
//!
//! ```rust
//! # use ssim::time::*;
//! let start = SimTime::ZERO;
//! let later = start + Duration::from_secs(1_000);
//!
//! assert_eq!(later.as_duration(), Duration::from_secs(1_000));
//! assert_eq!(later, SimTime::from(1_000.0));
//! ```

mod duration;
pub use duration::*;

use std::fmt::{Debug, Display};

///
/// A specific point of time in the simulation.
///
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(Duration);

impl SimTime {
    /// The smallest instance of a [`SimTime`], and the time every
    /// fresh simulation starts at.
    pub const ZERO: SimTime = SimTime(Duration::ZERO);
    /// The greatest instance of a [`SimTime`].
    pub const MAX: SimTime = SimTime(Duration::MAX);

    ///
    /// Constructs an instance of `SimTime` from a give duration since `SimTime::ZERO`.
    ///
    #[must_use]
    pub const fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    ///
    /// Returns the duration since `SimTime::ZERO`.
    ///
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Returns `Some(t)` where `t` is the time `self + duration` if `t` can be represented,
    /// `None` otherwise.
    #[must_use]
    pub fn checked_add(&self, duration: Duration) -> Option<SimTime> {
        self.0.checked_add(duration).map(SimTime)
    }
}

// Serialize

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Duration, SimTime};
    use serde::de::Visitor;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Serialize};

    impl Serialize for SimTime {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            if serializer.is_human_readable() {
                serializer.serialize_f64(self.0.as_secs_f64())
            } else {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("secs", &self.0.as_secs())?;
                map.serialize_entry("nanos", &self.0.subsec_nanos())?;
                map.end()
            }
        }
    }

    impl<'de> Deserialize<'de> for SimTime {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            struct SimTimeVisitor;
            impl<'de> Visitor<'de> for SimTimeVisitor {
                type Value = SimTime;
                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a positive number or an encoded Duration")
                }

                fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
                where
                    E: serde::de::Error,
                {
                    if v.is_finite() && v >= 0.0 {
                        Ok(SimTime::from_duration(Duration::from_secs_f64(v)))
                    } else {
                        Err(E::custom(format!("invalid simulation time {v}")))
                    }
                }

                fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
                where
                    E: serde::de::Error,
                {
                    Ok(SimTime::from_duration(Duration::from_secs(v)))
                }

                fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
                where
                    A: serde::de::MapAccess<'de>,
                {
                    let mut secs = 0;
                    let mut nanos = 0;
                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "secs" => secs = map.next_value()?,
                            "nanos" => nanos = map.next_value()?,
                            _ => {
                                return Err(serde::de::Error::unknown_field(
                                    &key,
                                    &["secs", "nanos"],
                                ))
                            }
                        }
                    }
                    Ok(SimTime::from_duration(Duration::new(secs, nanos)))
                }
            }

            deserializer.deserialize_any(SimTimeVisitor)
        }
    }
}

// FMT

impl Debug for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

// FROM

impl From<SimTime> for f64 {
    fn from(this: SimTime) -> Self {
        this.0.as_secs_f64()
    }
}

impl From<f64> for SimTime {
    fn from(value: f64) -> Self {
        SimTime(Duration::from_secs_f64(value))
    }
}

impl From<Duration> for SimTime {
    fn from(value: Duration) -> Self {
        SimTime(value)
    }
}
