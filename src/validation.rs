//! Field validation capability consumed by employee construction.
//!
//! The engine only depends on the [`Validator`] trait. [`DefaultValidator`]
//! is the stock implementation used when the caller does not bring its own.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of an employee id, in characters.
pub const MAX_EMPLOYEE_ID_LEN: usize = 40;

static EMPLOYEE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid employee id regex"));
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} ]+$").expect("valid name regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Pure predicates over employee identity fields.
pub trait Validator {
    /// Returns true when `value` is an acceptable email address.
    fn is_valid_email(&self, value: &str) -> bool;
    /// Returns true when `value` is an acceptable employee id.
    fn is_valid_employee_id(&self, value: &str) -> bool;
    /// Returns true when `value` is an acceptable person name.
    fn is_valid_name(&self, value: &str) -> bool;
}

/// Regex-backed validator.
///
/// # Example
///
/// ```
/// use payroll_engine::validation::{DefaultValidator, Validator};
///
/// let v = DefaultValidator;
/// assert!(v.is_valid_employee_id("EMP_001"));
/// assert!(v.is_valid_name("Ada Lovelace"));
/// assert!(v.is_valid_email("ada@example.com"));
/// assert!(!v.is_valid_name("   "));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn is_valid_email(&self, value: &str) -> bool {
        EMAIL_RE.is_match(value)
    }

    fn is_valid_employee_id(&self, value: &str) -> bool {
        value.chars().count() <= MAX_EMPLOYEE_ID_LEN && EMPLOYEE_ID_RE.is_match(value)
    }

    fn is_valid_name(&self, value: &str) -> bool {
        NAME_RE.is_match(value) && value.chars().any(char::is_alphabetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_id_rules() {
        let v = DefaultValidator;
        assert!(v.is_valid_employee_id("E-001_a"));
        assert!(!v.is_valid_employee_id(""));
        assert!(!v.is_valid_employee_id("E 001"));
        assert!(!v.is_valid_employee_id("E#1"));
        assert!(v.is_valid_employee_id(&"x".repeat(40)));
        assert!(!v.is_valid_employee_id(&"x".repeat(41)));
    }

    #[test]
    fn test_name_rules() {
        let v = DefaultValidator;
        assert!(v.is_valid_name("José Álvarez"));
        assert!(!v.is_valid_name(""));
        assert!(!v.is_valid_name("  "));
        assert!(!v.is_valid_name("R2D2"));
        assert!(!v.is_valid_name("O'Brien"));
    }

    #[test]
    fn test_email_rules() {
        let v = DefaultValidator;
        assert!(v.is_valid_email("first.last+tag@mail.example.org"));
        assert!(!v.is_valid_email("no-at-sign.example.com"));
        assert!(!v.is_valid_email("user@localhost"));
        assert!(!v.is_valid_email("user@@example.com"));
        assert!(!v.is_valid_email(""));
    }
}
