//! Monthly salary proration.
//!
//! A fixed monthly salary is allocated across an arbitrary date range by
//! splitting the range into calendar-month segments and paying, for each
//! segment, the fraction of the month it covers. The total is rounded once,
//! at the end.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::PayrollResult;
use crate::models::{AuditStep, PayCategory, PayLine, PayPeriod};

use super::round_money;

/// The result of prorating a salary over a pay period.
#[derive(Debug, Clone)]
pub struct ProratedSalaryResult {
    /// The total, rounded to cents.
    pub amount: Decimal,
    /// The exact sum of the month lines before rounding.
    pub unrounded_amount: Decimal,
    /// One pay line per calendar month touched by the period.
    pub pay_lines: Vec<PayLine>,
    /// One audit step per month, followed by the rounding step.
    pub audit_steps: Vec<AuditStep>,
}

/// Prorates `monthly_salary` over the inclusive range `start..=end`.
///
/// # Errors
///
/// Returns `InvalidRange` when `end` is before `start`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::prorate_salary;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let salary = Decimal::from_str("3000.00").unwrap();
/// let pay = prorate_salary(
///     salary,
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(pay, salary);
/// ```
pub fn prorate_salary(
    monthly_salary: Decimal,
    start: NaiveDate,
    end: NaiveDate,
) -> PayrollResult<Decimal> {
    let period = PayPeriod::new(start, end)?;
    Ok(calculate_prorated_salary(monthly_salary, &period, 1)?.amount)
}

/// Prorates `monthly_salary` over `period`, keeping a line and an audit step
/// for every month.
///
/// Each month contributes `monthly_salary × overlap_days / days_in_month`.
/// The contributions are summed exactly and the sum is rounded to two
/// decimal places, half away from zero.
///
/// # Errors
///
/// Returns `InvalidRange` when the period ends before it starts.
pub fn calculate_prorated_salary(
    monthly_salary: Decimal,
    period: &PayPeriod,
    step_number: u32,
) -> PayrollResult<ProratedSalaryResult> {
    period.validate()?;

    let mut step_number = step_number;
    let mut pay_lines = Vec::new();
    let mut audit_steps = Vec::new();
    let mut unrounded_amount = Decimal::ZERO;

    for segment in period.month_segments() {
        let overlap = Decimal::from(segment.overlap_days);
        let days_in_month = Decimal::from(segment.days_in_month);

        // Multiply before dividing so a full month is exact.
        let amount = monthly_salary * overlap / days_in_month;
        unrounded_amount += amount;

        audit_steps.push(AuditStep {
            step_number,
            rule_id: "salary_proration".to_string(),
            rule_name: "Monthly Salary Proration".to_string(),
            input: serde_json::json!({
                "month": segment.month_start.format("%Y-%m").to_string(),
                "first_day": segment.first_day.to_string(),
                "last_day": segment.last_day.to_string(),
                "monthly_salary": monthly_salary.to_string()
            }),
            output: serde_json::json!({
                "overlap_days": segment.overlap_days,
                "days_in_month": segment.days_in_month,
                "amount": amount.normalize().to_string()
            }),
            reasoning: format!(
                "${} x {}/{} days = ${}",
                monthly_salary.normalize(),
                segment.overlap_days,
                segment.days_in_month,
                round_money(amount)
            ),
        });
        step_number += 1;

        pay_lines.push(PayLine {
            category: PayCategory::ProratedSalary,
            first_day: segment.first_day,
            last_day: segment.last_day,
            units: overlap,
            unit_basis: days_in_month,
            rate: monthly_salary,
            amount,
        });
    }

    let amount = round_money(unrounded_amount);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "rounding".to_string(),
        rule_name: "Round To Cents".to_string(),
        input: serde_json::json!({ "amount": unrounded_amount.normalize().to_string() }),
        output: serde_json::json!({ "amount": amount.to_string() }),
        reasoning: "Total rounded once to 2 decimal places, half away from zero".to_string(),
    });

    Ok(ProratedSalaryResult {
        amount,
        unrounded_amount,
        pay_lines,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_month_pays_exact_salary() {
        let pay = prorate_salary(dec("3000.00"), date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(pay, dec("3000.00"));
    }

    #[test]
    fn test_full_leap_february_pays_exact_salary() {
        let pay = prorate_salary(dec("2900.00"), date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        assert_eq!(pay, dec("2900.00"));
    }

    #[test]
    fn test_awkward_salary_full_month_is_exact() {
        let pay = prorate_salary(dec("1234.57"), date(2023, 9, 1), date(2023, 9, 30)).unwrap();
        assert_eq!(pay, dec("1234.57"));
    }

    #[test]
    fn test_cross_month_example() {
        // Feb 2024: 20 days of 29; Mar: 5 days of 31.
        let result = calculate_prorated_salary(
            dec("3100.00"),
            &PayPeriod::new(date(2024, 2, 10), date(2024, 3, 5)).unwrap(),
            1,
        )
        .unwrap();

        let expected = dec("3100") * dec("20") / dec("29") + dec("3100") * dec("5") / dec("31");
        assert_eq!(result.unrounded_amount, expected);
        assert_eq!(result.amount, dec("2637.93"));
        assert_eq!(result.pay_lines.len(), 2);
        assert_eq!(result.pay_lines[1].amount, dec("500"));
    }

    #[test]
    fn test_single_day() {
        let pay = prorate_salary(dec("3100.00"), date(2024, 3, 15), date(2024, 3, 15)).unwrap();
        assert_eq!(pay, dec("100.00"));
    }

    #[test]
    fn test_multi_month_with_full_middle_months() {
        let pay = prorate_salary(dec("3000.00"), date(2024, 1, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(pay, dec("9000.00"));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 0.05 x 15/30 = 0.025 -> 0.03
        let pay = prorate_salary(dec("0.05"), date(2023, 4, 1), date(2023, 4, 15)).unwrap();
        assert_eq!(pay, dec("0.03"));
    }

    #[test]
    fn test_zero_salary() {
        let pay = prorate_salary(Decimal::ZERO, date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(pay, Decimal::ZERO);
    }

    #[test]
    fn test_reversed_range_fails_before_computation() {
        let result = prorate_salary(dec("3000.00"), date(2024, 2, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(PayrollError::InvalidRange { .. })));
    }

    #[test]
    fn test_audit_steps_sequenced() {
        let result = calculate_prorated_salary(
            dec("3000.00"),
            &PayPeriod::new(date(2023, 12, 20), date(2024, 1, 10)).unwrap(),
            4,
        )
        .unwrap();

        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![4, 5, 6]);
        assert_eq!(result.audit_steps[2].rule_id, "rounding");
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| date(2020, 1, 1) + chrono::Duration::days(offset))
    }

    proptest! {
        #[test]
        fn prop_split_ranges_add_up_within_a_cent(
            start in arb_date(),
            len in 1i64..800,
            split in 0i64..800,
            cents in 0i64..100_000_000,
        ) {
            let salary = Decimal::new(cents, 2);
            let end = start + chrono::Duration::days(len);
            let mid = start + chrono::Duration::days(split % len);

            let whole = prorate_salary(salary, start, end).unwrap();
            let left = prorate_salary(salary, start, mid).unwrap();
            let right = prorate_salary(salary, mid.succ_opt().unwrap(), end).unwrap();

            prop_assert!((left + right - whole).abs() <= dec("0.01"));
        }

        #[test]
        fn prop_full_month_is_exact(year in 2000i32..2100, month in 1u32..=12, cents in 0i64..100_000_000_000) {
            let salary = Decimal::new(cents, 2);
            let period = PayPeriod::month_of(date(year, month, 1));
            let pay = prorate_salary(salary, period.start_date, period.end_date).unwrap();
            prop_assert_eq!(pay, salary);
        }
    }
}
