//! Time and timestamp helpers.

use chrono::{DateTime, TimeZone, Utc};

/// UTC timestamp used for countdown targets and scheduled snoozes.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Source of "now", injected wherever the current time matters.
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    #[must_use]
    pub fn new(at: Timestamp) -> Self {
        Self(at)
    }

    /// Freeze the clock at `millis` since the Unix epoch.
    ///
    /// Out-of-range values fall back to the epoch itself.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = SystemClock.now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_report_frozen_millis_when_clock_is_fixed() {
        let clock = FixedClock::from_millis(1_700_000_000_250);
        assert_eq!(clock.now_millis(), 1_700_000_000_250);
        assert_eq!(clock.now_millis(), 1_700_000_000_250);
    }
}
