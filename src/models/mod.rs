//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_period;
mod pay_statement;
mod time_record;

pub use employee::{Compensation, Employee, EmployeeFields, EmploymentType, max_amount};
pub use pay_period::{MonthSegment, PayPeriod, first_day_of_month, last_day_of_month};
pub use pay_statement::{AuditStep, AuditTrace, AuditWarning, PayCategory, PayLine, PayStatement};
pub(crate) use time_record::check_line_field;
pub use time_record::{
    RECORD_ID_PREFIX, TimeRecord, default_max_shift_hours, format_record_id, record_number,
};
