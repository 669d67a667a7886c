//! Process-level facade over the roster, the attendance ledger and their
//! stores.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::attendance::{AttendanceLedger, NotificationSink};
use crate::calculation::calculate_pay_statement;
use crate::clock::Clock;
use crate::config::PayrollConfig;
use crate::error::PayrollResult;
use crate::models::{Compensation, Employee, EmployeeFields, PayPeriod, PayStatement, TimeRecord};
use crate::roster::Roster;
use crate::storage::{
    EmployeeJsonCodec, EmployeeStore, LoadOutcome, TimeRecordLineCodec, TimeRecordStore,
};
use crate::validation::{DefaultValidator, Validator};

/// How each store fared when a book was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenReport {
    /// Outcome of loading the employee store.
    pub employees: LoadOutcome,
    /// Outcome of loading the time-record store.
    pub time_records: LoadOutcome,
}

/// Result of saving each store. The two saves are independent; one can
/// fail while the other succeeds.
#[derive(Debug)]
pub struct SaveReport {
    /// Result of saving the employee store.
    pub employees: PayrollResult<()>,
    /// Result of saving the time-record store.
    pub time_records: PayrollResult<()>,
}

impl SaveReport {
    /// True when both stores were saved.
    pub fn is_ok(&self) -> bool {
        self.employees.is_ok() && self.time_records.is_ok()
    }
}

/// Employees, their attendance, and where both are kept.
pub struct PayrollBook {
    config: PayrollConfig,
    clock: Arc<dyn Clock>,
    validator: Box<dyn Validator>,
    roster: Roster,
    ledger: AttendanceLedger,
    employee_store: EmployeeStore,
    record_store: TimeRecordStore,
}

impl PayrollBook {
    /// Opens the stores named by `config` and loads both collections.
    ///
    /// Missing or corrupt files never fail the open; the report says what
    /// happened to each.
    ///
    /// # Errors
    ///
    /// Returns `Io` when a data file exists but cannot be read.
    pub fn open(config: PayrollConfig, clock: Arc<dyn Clock>) -> PayrollResult<(Self, OpenReport)> {
        let employee_store =
            EmployeeStore::new(config.storage.employees_path(), EmployeeJsonCodec);
        let record_store =
            TimeRecordStore::new(config.storage.time_records_path(), TimeRecordLineCodec);

        let employees = employee_store.load()?;
        let records = record_store.load()?;

        let roster = Roster::from_employees(employees.items)?;
        let ledger =
            AttendanceLedger::from_records(records.items, clock.clone(), config.attendance.clone())?;

        let report = OpenReport {
            employees: employees.outcome,
            time_records: records.outcome,
        };
        info!(
            employees = roster.len(),
            time_records = ledger.len(),
            employees_outcome = ?report.employees,
            time_records_outcome = ?report.time_records,
            "Opened payroll book"
        );

        Ok((
            Self {
                config,
                clock,
                validator: Box::new(DefaultValidator),
                roster,
                ledger,
                employee_store,
                record_store,
            },
            report,
        ))
    }

    /// Replaces the validator used when adding employees.
    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// Subscribes a sink to clock events and roster messages.
    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.roster.subscribe(sink.clone());
        self.ledger.subscribe(sink);
    }

    /// Validates and adds a new employee.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad field, then `DuplicateEmployeeId` or
    /// `DuplicateEmail`.
    pub fn add_employee(
        &mut self,
        fields: EmployeeFields,
        compensation: Compensation,
    ) -> PayrollResult<&Employee> {
        let employee = Employee::create(
            self.validator.as_ref(),
            self.clock.today(),
            fields,
            compensation,
        )?;
        let employee_id = employee.employee_id().to_string();
        self.roster.add(employee)?;
        self.roster.require(&employee_id)
    }

    /// Removes an employee. Their time records are kept.
    pub fn remove_employee(&mut self, employee_id: &str) -> PayrollResult<Employee> {
        self.roster.remove(employee_id)
    }

    /// Opens a shift for a rostered employee.
    ///
    /// # Errors
    ///
    /// `EmployeeNotFound`, or any error from
    /// [`AttendanceLedger::clock_in`].
    pub fn clock_in(&mut self, employee_id: &str, notes: &str) -> PayrollResult<TimeRecord> {
        let employee_id = self.roster.require(employee_id)?.employee_id().to_string();
        self.ledger.clock_in(&employee_id, notes)
    }

    /// Closes the open shift of an employee.
    ///
    /// Works for employees who have since left the roster so that no shift
    /// stays open forever.
    pub fn clock_out(&mut self, employee_id: &str) -> PayrollResult<TimeRecord> {
        self.ledger.clock_out(employee_id)
    }

    /// Calculates pay for one employee over `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidRange` when `end < start`, `EmployeeNotFound` for an unknown
    /// id.
    pub fn pay_statement(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<PayStatement> {
        let period = PayPeriod::new(start, end)?;
        let employee = self.roster.require(employee_id)?;
        calculate_pay_statement(employee, &period, &self.ledger)
    }

    /// Saves both collections. Each store is attempted even if the other
    /// fails.
    pub fn save(&self) -> SaveReport {
        let report = SaveReport {
            employees: self.employee_store.save(self.roster.employees()),
            time_records: self.record_store.save(self.ledger.records()),
        };
        if !report.is_ok() {
            warn!(
                employees_saved = report.employees.is_ok(),
                time_records_saved = report.time_records.is_ok(),
                "Payroll book only partially saved"
            );
        }
        report
    }

    /// The employee roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The attendance ledger.
    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    /// The configuration the book was opened with.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }
}

impl std::fmt::Debug for PayrollBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollBook")
            .field("config", &self.config)
            .field("roster", &self.roster)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
