//! The attendance ledger.
//!
//! The ledger owns every [`TimeRecord`] in append order. A per-employee
//! index and an index of open records are derived from that list and are
//! updated together with it on every mutation; they can always be rebuilt
//! from the list alone.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::AttendanceConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayPeriod, TimeRecord, format_record_id, record_number};

use super::events::{ClockAction, ClockEvent, NotificationSink, Notifier};

/// Employee ids are matched case-insensitively.
fn employee_key(employee_id: &str) -> String {
    employee_id.trim().to_lowercase()
}

/// Checks that no employee has more than one open record.
///
/// # Errors
///
/// Returns `Corruption` naming the first employee with two open records.
pub fn check_single_active(records: &[TimeRecord]) -> PayrollResult<()> {
    let mut open: HashMap<String, &str> = HashMap::new();
    for record in records.iter().filter(|r| r.is_active()) {
        if let Some(first) = open.insert(employee_key(record.employee_id()), record.record_id()) {
            return Err(PayrollError::Corruption {
                path: "time records".to_string(),
                message: format!(
                    "employee '{}' has two open records ('{}' and '{}')",
                    record.employee_id(),
                    first,
                    record.record_id()
                ),
            });
        }
    }
    Ok(())
}

/// In-memory time-attendance state machine.
///
/// Per employee: no active shift → `clock_in` → active shift → `clock_out`
/// → no active shift. Closed records stay in history; nothing is deleted.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_engine::attendance::AttendanceLedger;
/// use payroll_engine::clock::FixedClock;
/// use payroll_engine::config::AttendanceConfig;
/// use chrono::{Duration, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let start = NaiveDateTime::parse_from_str("2024-03-04 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let clock = Arc::new(FixedClock::new(start));
/// let mut ledger = AttendanceLedger::new(clock.clone(), AttendanceConfig::default());
///
/// ledger.clock_in("E-001", "opening shift").unwrap();
/// clock.advance(Duration::hours(6));
/// ledger.clock_out("E-001").unwrap();
///
/// let hours = ledger.total_hours("E-001", start, start + Duration::days(1));
/// assert_eq!(hours, Decimal::new(6, 0));
/// ```
pub struct AttendanceLedger {
    records: Vec<TimeRecord>,
    by_employee: HashMap<String, Vec<usize>>,
    active: HashMap<String, usize>,
    next_number: u64,
    clock: Arc<dyn Clock>,
    settings: AttendanceConfig,
    notifier: Notifier,
}

impl AttendanceLedger {
    /// Creates an empty ledger.
    pub fn new(clock: Arc<dyn Clock>, settings: AttendanceConfig) -> Self {
        Self {
            records: Vec::new(),
            by_employee: HashMap::new(),
            active: HashMap::new(),
            next_number: 1,
            clock,
            settings,
            notifier: Notifier::new(),
        }
    }

    /// Creates a ledger holding `records`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` if an employee has more than one open record.
    pub fn from_records(
        records: Vec<TimeRecord>,
        clock: Arc<dyn Clock>,
        settings: AttendanceConfig,
    ) -> PayrollResult<Self> {
        let mut ledger = Self::new(clock, settings);
        ledger.replace_records(records)?;
        Ok(ledger)
    }

    /// Replaces the whole history, keeping the clock and the sinks.
    ///
    /// The next record number becomes one past the largest numeric suffix
    /// among the given record ids. On error the ledger is left unchanged.
    pub fn replace_records(&mut self, records: Vec<TimeRecord>) -> PayrollResult<()> {
        check_single_active(&records)?;

        self.next_number = records
            .iter()
            .filter_map(|r| record_number(r.record_id()))
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.records = records;
        self.rebuild_index();

        debug!(
            records = self.records.len(),
            active = self.active.len(),
            next_number = self.next_number,
            "Rebuilt attendance ledger"
        );
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.by_employee.clear();
        self.active.clear();
        for (index, record) in self.records.iter().enumerate() {
            let key = employee_key(record.employee_id());
            if record.is_active() {
                self.active.insert(key.clone(), index);
            }
            self.by_employee.entry(key).or_default().push(index);
        }
    }

    /// Subscribes a sink to clock events.
    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.notifier.subscribe(sink);
    }

    /// Opens a shift for `employee_id` at the current time.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClockedIn` if the employee already has an open record.
    pub fn clock_in(&mut self, employee_id: &str, notes: &str) -> PayrollResult<TimeRecord> {
        let key = employee_key(employee_id);
        if self.active.contains_key(&key) {
            warn!(employee_id = %employee_id, "Clock-in rejected: already clocked in");
            return Err(PayrollError::AlreadyClockedIn {
                employee_id: employee_id.to_string(),
            });
        }

        let now = self.clock.now();
        let record = TimeRecord::open(
            format_record_id(self.next_number),
            employee_id,
            now,
            notes,
            now,
            self.settings.clock_skew(),
        )?;

        let index = self.records.len();
        self.records.push(record.clone());
        self.by_employee.entry(key.clone()).or_default().push(index);
        self.active.insert(key, index);
        self.next_number += 1;

        info!(employee_id = %employee_id, record_id = %record.record_id(), "Clocked in");
        self.notifier.clock_event(&ClockEvent {
            employee_id: employee_id.to_string(),
            timestamp: now,
            action: ClockAction::ClockIn,
        });

        Ok(record)
    }

    /// Closes the open shift of `employee_id` at the current time.
    ///
    /// # Errors
    ///
    /// - `NoActiveShift` if the employee has no open record.
    /// - `InvalidTransition` if the clock reads earlier than the clock-in;
    ///   the record stays open.
    pub fn clock_out(&mut self, employee_id: &str) -> PayrollResult<TimeRecord> {
        let key = employee_key(employee_id);
        let Entry::Occupied(entry) = self.active.entry(key) else {
            warn!(employee_id = %employee_id, "Clock-out rejected: no active shift");
            return Err(PayrollError::NoActiveShift {
                employee_id: employee_id.to_string(),
            });
        };

        let now = self.clock.now();
        let record = &mut self.records[*entry.get()];
        record.close(now)?;
        let record = record.clone();
        entry.remove();

        info!(
            employee_id = %employee_id,
            record_id = %record.record_id(),
            hours = %record.hours_worked_capped(self.settings.max_shift_hours),
            "Clocked out"
        );
        self.notifier.clock_event(&ClockEvent {
            employee_id: employee_id.to_string(),
            timestamp: now,
            action: ClockAction::ClockOut,
        });

        Ok(record)
    }

    /// Sums the hours of closed records whose clock-in lies in `[start, end]`.
    ///
    /// Open records contribute nothing, even when the window includes now.
    pub fn total_hours(
        &self,
        employee_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Decimal {
        self.records_for(employee_id)
            .filter(|r| !r.is_active())
            .filter(|r| r.clock_in() >= start && r.clock_in() <= end)
            .map(|r| r.hours_worked_capped(self.settings.max_shift_hours))
            .sum()
    }

    /// Sums closed-record hours for every day of `period`.
    pub fn total_hours_in_period(&self, employee_id: &str, period: &PayPeriod) -> Decimal {
        self.total_hours(employee_id, period.start_datetime(), period.end_datetime())
    }

    /// The open record of `employee_id`, if any.
    pub fn active_record(&self, employee_id: &str) -> Option<&TimeRecord> {
        self.active
            .get(&employee_key(employee_id))
            .map(|&index| &self.records[index])
    }

    /// True when `employee_id` has an open record.
    pub fn is_clocked_in(&self, employee_id: &str) -> bool {
        self.active.contains_key(&employee_key(employee_id))
    }

    /// Records of `employee_id` in append order.
    pub fn records_for<'a>(
        &'a self,
        employee_id: &str,
    ) -> impl Iterator<Item = &'a TimeRecord> + use<'a> {
        self.by_employee
            .get(&employee_key(employee_id))
            .into_iter()
            .flatten()
            .map(move |&index| &self.records[index])
    }

    /// Every record in append order.
    pub fn records(&self) -> &[TimeRecord] {
        &self.records
    }

    /// Every open record.
    pub fn active_records(&self) -> impl Iterator<Item = &TimeRecord> {
        self.records.iter().filter(|r| r.is_active())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sequence number the next clock-in will use.
    pub fn next_record_number(&self) -> u64 {
        self.next_number
    }

    /// The bounds this ledger applies.
    pub fn settings(&self) -> &AttendanceConfig {
        &self.settings
    }
}

impl std::fmt::Debug for AttendanceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendanceLedger")
            .field("records", &self.records.len())
            .field("active", &self.active.len())
            .field("next_number", &self.next_number)
            .field("notifier", &self.notifier)
            .finish()
    }
}
