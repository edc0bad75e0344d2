//! # Time Source
//!
//! Overdue checks and invoice numbering read "now". The clock is passed in so
//! callers in tests can pin it; production code uses [`SystemClock`].

use chrono::{DateTime, Utc};

/// Something that knows the current moment.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub const fn new(at: DateTime<Utc>) -> Self {
        FixedClock(at)
    }

    /// Builds a clock from epoch milliseconds.
    ///
    /// Returns `None` when the value is out of chrono's range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(FixedClock)
    }
}

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::from_millis(1_700_000_000_000).unwrap();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
