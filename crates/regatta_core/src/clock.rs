//! Time sources for snapshot timestamps.

use chrono::{Duration, Local, NaiveDateTime};
use std::sync::atomic::{AtomicI64, Ordering};

/// Supplies the current local time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> NaiveDateTime;
}

/// The wall clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Advances by a fixed step on every call, starting at `start`.
#[derive(Debug)]
pub struct SteppingClock {
    start: NaiveDateTime,
    step: Duration,
    ticks: AtomicI64,
}

impl SteppingClock {
    /// Creates a clock whose first reading is `start`.
    #[must_use]
    pub fn new(start: NaiveDateTime, step: Duration) -> Self {
        Self {
            start,
            step,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        let offset = self.step * i32::try_from(tick).unwrap_or(i32::MAX);
        self.start + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stepping_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let clock = SteppingClock::new(start, Duration::seconds(1));

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(1));
    }
}
