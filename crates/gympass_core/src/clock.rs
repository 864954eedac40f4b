//! Time source abstraction for time-dependent business rules.
//!
//! # Responsibility
//! - Provide the current time in epoch milliseconds.
//! - Compute UTC calendar-day bounds for same-day rules.
//!
//! # Invariants
//! - Day bounds are half-open: `[start, end)`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cell::Cell;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of "now" for services.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replay tooling.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    /// Starts the clock at the given UTC wall time.
    ///
    /// Invalid date components fall back to the Unix epoch.
    pub fn at_utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        let ms = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .map(|naive| naive.and_utc().timestamp_millis())
            .unwrap_or(0);
        Self::new(ms)
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms.set(self.now_ms.get() + by.num_milliseconds());
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// UTC calendar date containing `ms`.
pub fn utc_date(ms: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// Half-open `[start, end)` epoch-millisecond bounds of a UTC calendar day.
pub fn utc_day_bounds(day: NaiveDate) -> (i64, i64) {
    let start = day
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or(0);
    (start, start + MS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::{utc_date, utc_day_bounds, Clock, ManualClock};
    use chrono::{Duration, NaiveDate};

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at_utc(2023, 1, 20, 8, 0);
        let start = clock.now_ms();
        clock.advance(Duration::minutes(21));
        assert_eq!(clock.now_ms() - start, 21 * 60 * 1000);
    }

    #[test]
    fn day_bounds_cover_whole_utc_day() {
        let clock = ManualClock::at_utc(2023, 1, 20, 23, 59);
        let day = utc_date(clock.now_ms());
        assert_eq!(day, NaiveDate::from_ymd_opt(2023, 1, 20).unwrap());

        let (start, end) = utc_day_bounds(day);
        assert!(start <= clock.now_ms() && clock.now_ms() < end);
        assert_eq!(utc_date(end), NaiveDate::from_ymd_opt(2023, 1, 21).unwrap());
    }
}
