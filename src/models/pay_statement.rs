//! Pay statement models.
//!
//! This module contains the [`PayStatement`] type and its associated
//! structures that capture everything a pay calculation produced: the pay
//! lines, the gross total, and an audit trace of each step.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmploymentType, PayPeriod};

/// Represents the category of pay for a pay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    /// A share of a monthly salary for the days worked in one calendar month.
    ProratedSalary,
    /// Hours recorded in the attendance ledger at an hourly rate.
    Hourly,
}

/// A single line item in a pay statement.
///
/// For prorated salary lines `units` counts days and `unit_basis` is the
/// length of the month; for hourly lines `units` counts hours and
/// `unit_basis` is one.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayCategory, PayLine};
/// use rust_decimal::Decimal;
/// use chrono::NaiveDate;
///
/// let line = PayLine {
///     category: PayCategory::ProratedSalary,
///     first_day: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     last_day: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
///     units: Decimal::new(5, 0),
///     unit_basis: Decimal::new(31, 0),
///     rate: Decimal::new(3100, 0),
///     amount: Decimal::new(500, 0),
/// };
/// assert_eq!(line.amount, Decimal::new(500, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// The category of pay.
    pub category: PayCategory,
    /// The first day covered by this line.
    pub first_day: NaiveDate,
    /// The last day covered by this line.
    pub last_day: NaiveDate,
    /// Days (prorated salary) or hours (hourly) paid on this line.
    pub units: Decimal,
    /// Divisor applied to `units` before the rate.
    pub unit_basis: Decimal,
    /// The monthly salary or hourly rate.
    pub rate: Decimal,
    /// `rate × units / unit_basis`, unrounded.
    pub amount: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings do not prevent the calculation but may need attention, such as
/// an open shift that was left out of an hourly total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a pay calculation for one employee and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayStatement {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the statement is for.
    pub employee_id: String,
    /// How the employee is paid.
    pub employment_type: EmploymentType,
    /// The period the statement covers.
    pub pay_period: PayPeriod,
    /// Individual pay lines making up the statement.
    pub pay_lines: Vec<PayLine>,
    /// Sum of the pay lines, rounded once to cents.
    pub gross_pay: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
