//! Time record model.
//!
//! A [`TimeRecord`] is one attendance interval. It is created open when an
//! employee clocks in and closed exactly once when they clock out.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Hours credited to a single closed record are capped at this value.
pub fn default_max_shift_hours() -> Decimal {
    Decimal::new(72, 0)
}

/// Prefix of sequential record ids.
pub const RECORD_ID_PREFIX: &str = "TR";

/// Formats the record id for sequence number `number`.
///
/// ```
/// assert_eq!(payroll_engine::models::format_record_id(7), "TR0007");
/// ```
pub fn format_record_id(number: u64) -> String {
    format!("{}{:04}", RECORD_ID_PREFIX, number)
}

/// Extracts the trailing numeric part of a record id, if any.
///
/// Ids edited by hand may carry any prefix; only the trailing digits count.
pub fn record_number(record_id: &str) -> Option<u64> {
    let prefix_len = record_id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    record_id[prefix_len..].parse().ok()
}

/// Represents one clock-in/clock-out interval for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    record_id: String,
    employee_id: String,
    clock_in: NaiveDateTime,
    clock_out: Option<NaiveDateTime>,
    notes: String,
}

impl TimeRecord {
    /// Opens a new record.
    ///
    /// Line breaks in `notes` are replaced by spaces.
    ///
    /// `clock_in` is checked against `now + skew`. The ledger stamps
    /// clock-ins with the current time, so the check only rejects anything
    /// for callers that supply their own timestamp, such as import tooling.
    ///
    /// # Errors
    ///
    /// - `Validation` on `employee_id` when it is empty or contains `|` or a
    ///   line break.
    /// - `Validation` on `clock_in` when it lies more than `skew` after `now`.
    pub fn open(
        record_id: impl Into<String>,
        employee_id: impl Into<String>,
        clock_in: NaiveDateTime,
        notes: &str,
        now: NaiveDateTime,
        skew: Duration,
    ) -> PayrollResult<Self> {
        let employee_id = employee_id.into();
        check_line_field("employee_id", &employee_id)?;

        if clock_in > now + skew {
            return Err(PayrollError::validation(
                "clock_in",
                format!("{} is in the future", clock_in),
            ));
        }

        Ok(Self {
            record_id: record_id.into(),
            employee_id,
            clock_in,
            clock_out: None,
            notes: fold_line_breaks(notes),
        })
    }

    /// Rebuilds a record from persisted data.
    pub fn restore(
        record_id: impl Into<String>,
        employee_id: impl Into<String>,
        clock_in: NaiveDateTime,
        clock_out: Option<NaiveDateTime>,
        notes: &str,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            employee_id: employee_id.into(),
            clock_in,
            clock_out,
            notes: fold_line_breaks(notes),
        }
    }

    /// Closes the record at `at`.
    ///
    /// # Errors
    ///
    /// - `NoActiveShift` if the record is already closed.
    /// - `InvalidTransition` if `at` is before the clock-in; the record stays open.
    pub fn close(&mut self, at: NaiveDateTime) -> PayrollResult<()> {
        if self.clock_out.is_some() {
            return Err(PayrollError::NoActiveShift {
                employee_id: self.employee_id.clone(),
            });
        }
        if at < self.clock_in {
            return Err(PayrollError::InvalidTransition {
                record_id: self.record_id.clone(),
                clock_in: self.clock_in,
                clock_out: at,
            });
        }
        self.clock_out = Some(at);
        Ok(())
    }

    /// Returns the record id.
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Returns the id of the employee this record belongs to.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// Returns the clock-in time.
    pub fn clock_in(&self) -> NaiveDateTime {
        self.clock_in
    }

    /// Returns the clock-out time, if the record is closed.
    pub fn clock_out(&self) -> Option<NaiveDateTime> {
        self.clock_out
    }

    /// Returns the free-text notes.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// True while the record has no clock-out.
    pub fn is_active(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Hours worked, capped at 72.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::TimeRecord;
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    /// let record = TimeRecord::restore(
    ///     "TR0001", "E-001",
    ///     at("2024-03-01 09:00:00"),
    ///     Some(at("2024-03-01 17:30:00")),
    ///     "",
    /// );
    /// assert_eq!(record.hours_worked(), Decimal::new(85, 1)); // 8.5 hours
    /// ```
    pub fn hours_worked(&self) -> Decimal {
        self.hours_worked_capped(default_max_shift_hours())
    }

    /// Hours worked, clamped to `[0, cap]`.
    ///
    /// `cap` itself is held to `[0, 72]`. An open record has worked zero
    /// hours. A clock-out before the clock-in (only possible in hand-edited
    /// data) also yields zero.
    pub fn hours_worked_capped(&self, cap: Decimal) -> Decimal {
        let Some(clock_out) = self.clock_out else {
            return Decimal::ZERO;
        };

        let seconds = (clock_out - self.clock_in).num_seconds();
        if seconds <= 0 {
            return Decimal::ZERO;
        }

        let hours = Decimal::new(seconds, 0) / Decimal::new(3600, 0);
        hours.min(cap.clamp(Decimal::ZERO, default_max_shift_hours()))
    }
}

/// Fails with a `Validation` error on `field` when `value` is empty or
/// contains a field separator or a line break.
pub(crate) fn check_line_field(field: &str, value: &str) -> PayrollResult<()> {
    if value.trim().is_empty() {
        return Err(PayrollError::validation(field, "must not be empty"));
    }
    if value.contains(['|', '\r', '\n']) {
        return Err(PayrollError::validation(
            field,
            "must not contain '|' or line breaks",
        ));
    }
    Ok(())
}

fn fold_line_breaks(notes: &str) -> String {
    notes.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn open_at(clock_in: &str) -> TimeRecord {
        TimeRecord::open(
            "TR0001",
            "E-001",
            at(clock_in),
            "",
            at("2024-03-01 09:00:00"),
            Duration::minutes(1),
        )
        .unwrap()
    }

    #[test]
    fn test_open_record_is_active_with_zero_hours() {
        let record = open_at("2024-03-01 09:00:00");
        assert!(record.is_active());
        assert_eq!(record.hours_worked(), Decimal::ZERO);
    }

    #[test]
    fn test_clock_in_within_skew_is_accepted() {
        let record = TimeRecord::open(
            "TR0001",
            "E-001",
            at("2024-03-01 09:01:00"),
            "",
            at("2024-03-01 09:00:00"),
            Duration::minutes(1),
        );
        assert!(record.is_ok());
    }

    #[test]
    fn test_clock_in_beyond_skew_is_rejected() {
        let record = TimeRecord::open(
            "TR0001",
            "E-001",
            at("2024-03-01 09:01:01"),
            "",
            at("2024-03-01 09:00:00"),
            Duration::minutes(1),
        );
        assert!(matches!(record, Err(PayrollError::Validation { field, .. }) if field == "clock_in"));
    }

    #[test]
    fn test_employee_id_unfit_for_storage_is_rejected() {
        for employee_id in ["A|B", "A\nB", "A\rB", "  "] {
            let record = TimeRecord::open(
                "TR0001",
                employee_id,
                at("2024-03-01 09:00:00"),
                "",
                at("2024-03-01 09:00:00"),
                Duration::minutes(1),
            );
            assert!(
                matches!(record, Err(PayrollError::Validation { ref field, .. }) if field == "employee_id"),
                "{:?}",
                employee_id
            );
        }
    }

    #[test]
    fn test_close_computes_hours() {
        let mut record = open_at("2024-03-01 09:00:00");
        record.close(at("2024-03-01 17:15:00")).unwrap();
        assert!(!record.is_active());
        assert_eq!(record.hours_worked(), Decimal::new(825, 2));
    }

    #[test]
    fn test_close_twice_is_rejected() {
        let mut record = open_at("2024-03-01 09:00:00");
        record.close(at("2024-03-01 10:00:00")).unwrap();
        let err = record.close(at("2024-03-01 11:00:00")).unwrap_err();
        assert!(matches!(err, PayrollError::NoActiveShift { .. }));
        assert_eq!(record.clock_out(), Some(at("2024-03-01 10:00:00")));
    }

    #[test]
    fn test_close_before_clock_in_is_invalid_transition() {
        let mut record = open_at("2024-03-01 09:00:00");
        let err = record.close(at("2024-03-01 08:59:59")).unwrap_err();
        assert!(matches!(err, PayrollError::InvalidTransition { .. }));
        assert!(record.is_active());
    }

    #[test]
    fn test_hours_capped_at_72() {
        let record = TimeRecord::restore(
            "TR0001",
            "E-001",
            at("2024-03-01 09:00:00"),
            Some(at("2024-03-05 09:00:00")),
            "",
        );
        assert_eq!(record.hours_worked(), Decimal::new(72, 0));
    }

    #[test]
    fn test_cap_never_exceeds_72() {
        let record = TimeRecord::restore(
            "TR0001",
            "E-001",
            at("2024-03-01 09:00:00"),
            Some(at("2024-03-11 09:00:00")),
            "",
        );
        assert_eq!(record.hours_worked_capped(Decimal::new(500, 0)), Decimal::new(72, 0));
        assert_eq!(record.hours_worked_capped(Decimal::new(12, 0)), Decimal::new(12, 0));
        assert_eq!(record.hours_worked_capped(Decimal::new(-1, 0)), Decimal::ZERO);
    }

    #[test]
    fn test_negative_duration_collapses_to_zero() {
        let record = TimeRecord::restore(
            "TR0001",
            "E-001",
            at("2024-03-01 09:00:00"),
            Some(at("2024-03-01 08:00:00")),
            "",
        );
        assert_eq!(record.hours_worked(), Decimal::ZERO);
    }

    #[test]
    fn test_notes_line_breaks_folded() {
        let record = TimeRecord::restore(
            "TR0001",
            "E-001",
            at("2024-03-01 09:00:00"),
            None,
            "front desk\r\ncover\nfor Sam",
        );
        assert_eq!(record.notes(), "front desk cover for Sam");
    }

    #[test]
    fn test_record_number_parsing() {
        assert_eq!(record_number("TR0042"), Some(42));
        assert_eq!(record_number("legacy-17"), Some(17));
        assert_eq!(record_number("12"), Some(12));
        assert_eq!(record_number("TR"), None);
        assert_eq!(record_number(""), None);
        assert_eq!(format_record_id(12345), "TR12345");
    }
}
