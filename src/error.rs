//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report. Each variant maps onto one of
//! the [`ErrorKind`] categories so callers can decide whether to re-prompt,
//! abort the single operation, or warn about lost data.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Broad category of a [`PayrollError`].
///
/// None of the categories is fatal to the process; the category tells the
/// caller how the failed operation left the in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad field format or range. The caller re-prompts or rejects the input.
    Validation,
    /// Duplicate identity or a state-machine conflict. State is unchanged.
    Conflict,
    /// Bad date range, bad numeric argument, or impossible transition.
    Range,
    /// Persisted data could not be parsed.
    Corruption,
    /// Disk failure.
    Io,
    /// Configuration could not be read.
    Config,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{ErrorKind, PayrollError};
///
/// let error = PayrollError::AlreadyClockedIn {
///     employee_id: "E-001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee 'E-001' is already clocked in");
/// assert_eq!(error.kind(), ErrorKind::Conflict);
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// An employee field failed validation.
    #[error("Invalid employee field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Another employee already uses this id (case-insensitive).
    #[error("Employee id '{employee_id}' already exists")]
    DuplicateEmployeeId {
        /// The conflicting id.
        employee_id: String,
    },

    /// Another employee already uses this email (case-insensitive).
    #[error("Email '{email}' is already registered")]
    DuplicateEmail {
        /// The conflicting email.
        email: String,
    },

    /// No employee with the given id exists in the roster.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: String,
    },

    /// The employee already has an open time record.
    #[error("Employee '{employee_id}' is already clocked in")]
    AlreadyClockedIn {
        /// The employee id.
        employee_id: String,
    },

    /// The employee has no open time record to close.
    #[error("Employee '{employee_id}' has no active shift")]
    NoActiveShift {
        /// The employee id.
        employee_id: String,
    },

    /// Closing the record would produce a clock-out before its clock-in.
    #[error("Invalid transition for record '{record_id}': clock-out {clock_out} is before clock-in {clock_in}")]
    InvalidTransition {
        /// The record being closed.
        record_id: String,
        /// The recorded clock-in time.
        clock_in: NaiveDateTime,
        /// The rejected clock-out time.
        clock_out: NaiveDateTime,
    },

    /// A date range ends before it starts.
    #[error("Invalid range: end date {end} is before start date {start}")]
    InvalidRange {
        /// The range start.
        start: NaiveDate,
        /// The range end.
        end: NaiveDate,
    },

    /// A numeric argument is negative, NaN or infinite.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument {
        /// The argument name.
        name: String,
        /// A description of the problem.
        message: String,
    },

    /// Persisted data could not be parsed.
    #[error("Corrupt data in '{path}': {message}")]
    Corruption {
        /// The file or logical source of the data.
        path: String,
        /// A description of the parse failure.
        message: String,
    },

    /// An employee record carries neither a known discriminator nor any
    /// field that identifies its variant.
    #[error("Unknown employee variant: {found}")]
    UnknownVariant {
        /// What was found in place of a known variant.
        found: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path being accessed.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl PayrollError {
    /// Builds a [`PayrollError::Validation`] for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a [`PayrollError::Io`] for `path`.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::DuplicateEmployeeId { .. }
            | Self::DuplicateEmail { .. }
            | Self::EmployeeNotFound { .. }
            | Self::AlreadyClockedIn { .. }
            | Self::NoActiveShift { .. } => ErrorKind::Conflict,
            Self::InvalidTransition { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidArgument { .. } => ErrorKind::Range,
            Self::Corruption { .. } | Self::UnknownVariant { .. } => ErrorKind::Corruption,
            Self::Io { .. } => ErrorKind::Io,
            Self::ConfigNotFound { .. } | Self::ConfigParseError { .. } => ErrorKind::Config,
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = PayrollError::validation("email", "not a valid address");
        assert_eq!(
            error.to_string(),
            "Invalid employee field 'email': not a valid address"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_range_displays_dates() {
        let error = PayrollError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid range: end date 2024-02-01 is before start date 2024-03-01"
        );
        assert_eq!(error.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_conflict_kinds() {
        let errors = [
            PayrollError::DuplicateEmployeeId {
                employee_id: "E1".to_string(),
            },
            PayrollError::DuplicateEmail {
                email: "a@b.co".to_string(),
            },
            PayrollError::NoActiveShift {
                employee_id: "E1".to_string(),
            },
            PayrollError::AlreadyClockedIn {
                employee_id: "E1".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.kind(), ErrorKind::Conflict);
        }
    }

    #[test]
    fn test_unknown_variant_is_corruption() {
        let error = PayrollError::UnknownVariant {
            found: "Contractor".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::Corruption);
        assert_eq!(error.to_string(), "Unknown employee variant: Contractor");
    }

    #[test]
    fn test_io_error_exposes_source() {
        use std::error::Error as _;

        let error = PayrollError::io(
            "/data/employees.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.source().is_some());
        assert!(error.to_string().contains("/data/employees.json"));
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_no_active_shift() -> PayrollResult<()> {
            Err(PayrollError::NoActiveShift {
                employee_id: "E1".to_string(),
            })
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_no_active_shift()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
