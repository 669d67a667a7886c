//! Pay statement assembly.
//!
//! Picks the pay rule for the employee's compensation, runs it over the
//! pay period, and records every step in the statement's audit trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::attendance::AttendanceLedger;
use crate::error::PayrollResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Compensation, Employee, PayCategory, PayLine, PayPeriod,
    PayStatement,
};

use super::{calculate_hourly_pay, calculate_prorated_salary};

/// Calculates pay for `employee` over `period`.
///
/// Full-time employees are paid their monthly salary prorated over the
/// period. Part-time employees are paid their hourly rate times the hours
/// of closed ledger records whose clock-in falls inside the period; an
/// open shift in the period is reported as a warning and left out.
///
/// # Errors
///
/// Returns `InvalidRange` when the period ends before it starts.
pub fn calculate_pay_statement(
    employee: &Employee,
    period: &PayPeriod,
    ledger: &AttendanceLedger,
) -> PayrollResult<PayStatement> {
    let start_time = Instant::now();
    period.validate()?;

    let mut audit_steps = vec![AuditStep {
        step_number: 1,
        rule_id: "pay_rule_selection".to_string(),
        rule_name: "Pay Rule Selection".to_string(),
        input: serde_json::json!({
            "employee_id": employee.employee_id(),
            "employment_type": employee.employment_type().as_str(),
            "start_date": period.start_date.to_string(),
            "end_date": period.end_date.to_string()
        }),
        output: serde_json::json!({
            "rule": match employee.compensation() {
                Compensation::FullTime { .. } => "salary_proration",
                Compensation::PartTime { .. } => "hourly_pay",
            }
        }),
        reasoning: format!(
            "{} employee, {} day period",
            employee.employment_type(),
            period.total_days()
        ),
    }];
    let mut warnings = Vec::new();

    let (pay_lines, gross_pay) = match employee.compensation() {
        Compensation::FullTime { monthly_salary, .. } => {
            let result = calculate_prorated_salary(*monthly_salary, period, 2)?;
            audit_steps.extend(result.audit_steps);
            (result.pay_lines, result.amount)
        }
        Compensation::PartTime { hourly_rate } => {
            let hours = ledger.total_hours_in_period(employee.employee_id(), period);

            if let Some(open) = ledger.active_record(employee.employee_id()) {
                if period.contains_date(open.clock_in().date()) {
                    warnings.push(AuditWarning {
                        code: "OPEN_SHIFT_EXCLUDED".to_string(),
                        message: format!(
                            "Record '{}' opened at {} is still active and was not paid",
                            open.record_id(),
                            open.clock_in()
                        ),
                    });
                }
            }

            let amount = calculate_hourly_pay(*hourly_rate, hours)?;
            audit_steps.push(AuditStep {
                step_number: 2,
                rule_id: "hourly_pay".to_string(),
                rule_name: "Hourly Pay".to_string(),
                input: serde_json::json!({
                    "hours": hours.normalize().to_string(),
                    "hourly_rate": hourly_rate.to_string()
                }),
                output: serde_json::json!({ "amount": amount.to_string() }),
                reasoning: format!(
                    "{}h x ${} = ${}",
                    hours.normalize(),
                    hourly_rate.normalize(),
                    amount
                ),
            });

            let line = PayLine {
                category: PayCategory::Hourly,
                first_day: period.start_date,
                last_day: period.end_date,
                units: hours,
                unit_basis: Decimal::ONE,
                rate: *hourly_rate,
                amount: *hourly_rate * hours,
            };
            (vec![line], amount)
        }
    };

    let duration_us = start_time.elapsed().as_micros() as u64;
    info!(
        employee_id = %employee.employee_id(),
        employment_type = %employee.employment_type(),
        gross_pay = %gross_pay,
        duration_us,
        "Pay statement calculated"
    );

    Ok(PayStatement {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.employee_id().to_string(),
        employment_type: employee.employment_type(),
        pay_period: period.clone(),
        pay_lines,
        gross_pay,
        audit_trace: AuditTrace {
            steps: audit_steps,
            warnings,
            duration_us,
        },
    })
}
