//! Hourly pay calculation.
//!
//! Part-time pay is the hourly rate times the hours recorded in the
//! attendance ledger, rounded to cents.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::error::{PayrollError, PayrollResult};

use super::round_money;

/// Computes `hourly_rate × hours`, rounded to cents half away from zero.
///
/// # Errors
///
/// Returns `InvalidArgument` when `hours` is negative.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_hourly_pay;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let pay = calculate_hourly_pay(
///     Decimal::from_str("22.50").unwrap(),
///     Decimal::from_str("37.5").unwrap(),
/// )
/// .unwrap();
/// assert_eq!(pay, Decimal::from_str("843.75").unwrap());
/// ```
pub fn calculate_hourly_pay(hourly_rate: Decimal, hours: Decimal) -> PayrollResult<Decimal> {
    if hours.is_sign_negative() && !hours.is_zero() {
        return Err(PayrollError::InvalidArgument {
            name: "hours".to_string(),
            message: format!("must not be negative, got {}", hours),
        });
    }
    Ok(round_money(hourly_rate * hours))
}

/// Converts a floating-point hour count supplied by an outside caller.
///
/// # Errors
///
/// Returns `InvalidArgument` when `hours` is NaN, infinite, negative, or
/// too large to represent.
pub fn hours_from_f64(hours: f64) -> PayrollResult<Decimal> {
    let invalid = |message: &str| PayrollError::InvalidArgument {
        name: "hours".to_string(),
        message: message.to_string(),
    };

    if hours.is_nan() {
        return Err(invalid("must be a number, got NaN"));
    }
    if hours.is_infinite() {
        return Err(invalid("must be finite"));
    }
    if hours < 0.0 {
        return Err(invalid("must not be negative"));
    }
    Decimal::from_f64(hours).ok_or_else(|| invalid("is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rate_times_hours() {
        assert_eq!(calculate_hourly_pay(dec("20"), dec("8")).unwrap(), dec("160"));
        assert_eq!(calculate_hourly_pay(dec("18.75"), dec("7.5")).unwrap(), dec("140.63"));
    }

    #[test]
    fn test_zero_hours() {
        assert_eq!(
            calculate_hourly_pay(dec("18.75"), Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_negative_hours_rejected() {
        let result = calculate_hourly_pay(dec("18.75"), dec("-0.5"));
        assert!(matches!(result, Err(PayrollError::InvalidArgument { .. })));
    }

    #[test]
    fn test_hours_from_f64() {
        assert_eq!(hours_from_f64(7.25).unwrap(), dec("7.25"));
        assert_eq!(hours_from_f64(0.0).unwrap(), Decimal::ZERO);
        assert!(hours_from_f64(f64::NAN).is_err());
        assert!(hours_from_f64(f64::INFINITY).is_err());
        assert!(hours_from_f64(f64::NEG_INFINITY).is_err());
        assert!(hours_from_f64(-1.0).is_err());
    }
}
