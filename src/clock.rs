//! Time sources.
//!
//! The ledger and employee validation never read the system clock directly;
//! they ask a [`Clock`]. Timestamps are truncated to whole seconds because
//! that is the precision the time-record file stores.

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};

/// A source of the current local time.
pub trait Clock {
    /// The current local time, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;

    /// The current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_seconds(Local::now().naive_local())
    }
}

/// A clock that reports whatever time it was last set to.
///
/// # Example
///
/// ```
/// use payroll_engine::clock::{Clock, FixedClock};
/// use chrono::{Duration, NaiveDateTime};
///
/// let start = NaiveDateTime::parse_from_str("2024-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let clock = FixedClock::new(start);
/// clock.advance(Duration::hours(8));
/// assert_eq!(clock.now().to_string(), "2024-03-01 17:00:00");
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(truncate_to_seconds(now)),
        }
    }

    /// Moves the clock to `now`. Moving backwards is allowed.
    pub fn set(&self, now: NaiveDateTime) {
        *self.lock() = truncate_to_seconds(now);
    }

    /// Moves the clock by `delta`, which may be negative.
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.lock();
        *guard += delta;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        // A poisoned guard still holds a valid timestamp.
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}

fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_system_clock_has_no_subsecond_part() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let clock = FixedClock::new(at("2024-01-31 23:30:00"));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        clock.advance(Duration::hours(1));
        assert_eq!(clock.now(), at("2024-02-01 00:30:00"));

        clock.set(at("2023-12-25 08:00:00"));
        assert_eq!(clock.now(), at("2023-12-25 08:00:00"));
    }

    #[test]
    fn test_fixed_clock_truncates_input() {
        let precise = at("2024-01-01 10:00:00") + Duration::milliseconds(750);
        let clock = FixedClock::new(precise);
        assert_eq!(clock.now(), at("2024-01-01 10:00:00"));
    }
}
