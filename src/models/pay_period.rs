//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type, an inclusive range of
//! calendar dates, and its partition into [`MonthSegment`]s used by salary
//! proration.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// An inclusive range of calendar dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert_eq!(period.month_segments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `end_date` is before `start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> PayrollResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Creates a pay period covering the whole calendar month of `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self {
            start_date: first_day_of_month(date),
            end_date: last_day_of_month(date),
        }
    }

    /// Checks that the period does not end before it starts.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.end_date < self.start_date {
            return Err(PayrollError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of days in the period, counting both ends.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// The first instant of the period.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    /// The last whole second of the period.
    pub fn end_datetime(&self) -> NaiveDateTime {
        self.end_date.and_hms_opt(23, 59, 59).unwrap_or(self.end_date.and_time(NaiveTime::MIN))
    }

    /// Splits the period into one segment per calendar month it touches.
    ///
    /// Returns an empty list for a period that ends before it starts.
    pub fn month_segments(&self) -> Vec<MonthSegment> {
        let mut segments = Vec::new();
        if self.end_date < self.start_date {
            return segments;
        }

        let mut month_start = first_day_of_month(self.start_date);
        while month_start <= self.end_date {
            let month_end = last_day_of_month(month_start);
            let first_day = self.start_date.max(month_start);
            let last_day = self.end_date.min(month_end);

            segments.push(MonthSegment {
                month_start,
                first_day,
                last_day,
                overlap_days: (last_day - first_day).num_days() + 1,
                days_in_month: (month_end - month_start).num_days() + 1,
            });

            match month_end.succ_opt() {
                Some(next) => month_start = next,
                None => break,
            }
        }

        segments
    }
}

/// The part of a pay period that falls within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSegment {
    /// The first day of the calendar month.
    pub month_start: NaiveDate,
    /// The first day of the period inside this month.
    pub first_day: NaiveDate,
    /// The last day of the period inside this month.
    pub last_day: NaiveDate,
    /// Days of the period inside this month, counting both ends.
    pub overlap_days: i64,
    /// Length of the calendar month.
    pub days_in_month: i64,
}

impl MonthSegment {
    /// True when the segment covers the whole calendar month.
    pub fn is_full_month(&self) -> bool {
        self.overlap_days == self.days_in_month
    }
}

/// The first day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The last day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}
