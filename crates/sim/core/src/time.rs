//! Simulated time.
//!
//! The simulation clock is measured as elapsed [`Duration`] since the start of
//! a trial. Durations in this crate are never negative: every "time until"
//! query saturates at zero instead of going below it.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Sentinel remaining-duration for effects that never expire.
pub const NEVER_EXPIRES: Duration = Duration::MAX;

/// Smallest time step the simulation distinguishes.
///
/// Recomputed periods are rounded to this granularity before they are
/// compared with snapshotted ones.
pub const MIN_TIME_GRANULARITY: Duration = Duration::from_millis(1);

/// Point in simulated time, expressed as elapsed time since trial start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub Duration);

impl SimTime {
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Negative and NaN inputs clamp to zero; overly large ones saturate.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self(Duration::try_from_secs_f64(secs).unwrap_or(NEVER_EXPIRES))
    }

    #[inline]
    pub fn elapsed(self) -> Duration {
        self.0
    }

    /// Time remaining from `self` until `later`, or zero if `later` has passed.
    #[inline]
    pub fn until(self, later: SimTime) -> Duration {
        later.0.saturating_sub(self.0)
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0.saturating_add(rhs))
    }
}

impl AddAssign<Duration> for SimTime {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}

/// Rounds a duration to the nearest multiple of `granularity`.
pub fn round_duration(duration: Duration, granularity: Duration) -> Duration {
    let step = granularity.as_nanos();
    if step == 0 {
        return duration;
    }
    let nanos = duration.as_nanos();
    let rounded = (nanos + step / 2) / step * step;
    Duration::from_nanos(u64::try_from(rounded).unwrap_or(u64::MAX))
}

/// Scales a duration by a non-negative factor, saturating on overflow.
pub fn scale_duration(duration: Duration, factor: f64) -> Duration {
    if !factor.is_finite() || factor <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(NEVER_EXPIRES)
}

/// Divides a duration by a positive divisor, saturating on overflow.
pub fn divide_duration(duration: Duration, divisor: f64) -> Duration {
    if !divisor.is_finite() || divisor <= 0.0 {
        return duration;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() / divisor).unwrap_or(NEVER_EXPIRES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_saturates_when_target_is_in_the_past() {
        let now = SimTime::from_secs_f64(10.0);
        assert_eq!(now.until(SimTime::from_secs_f64(4.0)), Duration::ZERO);
        assert_eq!(
            now.until(SimTime::from_secs_f64(12.5)),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn from_secs_saturates_out_of_range_input() {
        assert_eq!(SimTime::from_secs_f64(-2.0), SimTime::ZERO);
        assert_eq!(SimTime::from_secs_f64(f64::NAN), SimTime::ZERO);
        assert_eq!(SimTime::from_secs_f64(f64::INFINITY).elapsed(), NEVER_EXPIRES);
        assert_eq!(SimTime::from_secs_f64(1e30).elapsed(), NEVER_EXPIRES);
    }

    #[test]
    fn rounding_removes_float_noise() {
        let noisy = Duration::from_secs_f64(3.0 / 1.3);
        let rounded = round_duration(noisy, MIN_TIME_GRANULARITY);
        assert_eq!(rounded, Duration::from_millis(2308));
    }

    #[test]
    fn scale_rejects_negative_factors() {
        assert_eq!(scale_duration(Duration::from_secs(3), -1.0), Duration::ZERO);
        assert_eq!(
            scale_duration(Duration::from_secs(3), 0.5),
            Duration::from_millis(1500)
        );
    }
}
