//! Pay calculation for the payroll engine.
//!
//! This module contains the salary proration algorithm for full-time
//! employees, hourly pay for part-time employees, and the assembly of both
//! into a [`PayStatement`](crate::models::PayStatement).

mod hourly;
mod proration;
mod statement;

use rust_decimal::{Decimal, RoundingStrategy};

pub use hourly::{calculate_hourly_pay, hours_from_f64};
pub use proration::{ProratedSalaryResult, calculate_prorated_salary, prorate_salary};
pub use statement::calculate_pay_statement;

/// Rounds a money amount to cents, half away from zero.
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(2025, 3)), Decimal::new(203, 2));   // 2.025 -> 2.03
/// assert_eq!(round_money(Decimal::new(-2025, 3)), Decimal::new(-203, 2)); // -2.025 -> -2.03
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
