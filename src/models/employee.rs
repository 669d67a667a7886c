//! Employee model and related types.
//!
//! An [`Employee`] carries validated identity fields plus a [`Compensation`]
//! that is either a fixed monthly salary or an hourly rate. Identity fields
//! cannot be changed once the employee has been created.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::calculate_hourly_pay;
use crate::error::{PayrollError, PayrollResult};
use crate::validation::{MAX_EMPLOYEE_ID_LEN, Validator};

/// Upper bound for every monetary field on an employee.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000, 0)
}

/// Represents the type of employment arrangement.
///
/// The `Display` form is the discriminator written to the employee store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    /// Paid a fixed monthly salary.
    FullTime,
    /// Paid per hour worked.
    PartTime,
}

impl EmploymentType {
    /// The discriminator string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "FullTime",
            EmploymentType::PartTime => "PartTime",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an employee is paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Fixed monthly salary, prorated over partial months.
    FullTime {
        /// Salary for one full calendar month.
        monthly_salary: Decimal,
        /// Stored and validated, never applied by any pay calculation.
        overtime_rate: Decimal,
    },
    /// Hourly rate applied to hours recorded in the attendance ledger.
    PartTime {
        /// Pay per hour worked.
        hourly_rate: Decimal,
    },
}

impl Compensation {
    /// Returns the employment type this compensation belongs to.
    pub fn employment_type(&self) -> EmploymentType {
        match self {
            Compensation::FullTime { .. } => EmploymentType::FullTime,
            Compensation::PartTime { .. } => EmploymentType::PartTime,
        }
    }

    fn validate(&self) -> PayrollResult<()> {
        match self {
            Compensation::FullTime {
                monthly_salary,
                overtime_rate,
            } => {
                check_amount("monthly_salary", *monthly_salary)?;
                check_amount("overtime_rate", *overtime_rate)
            }
            Compensation::PartTime { hourly_rate } => check_amount("hourly_rate", *hourly_rate),
        }
    }
}

fn check_amount(field: &str, value: Decimal) -> PayrollResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PayrollError::validation(field, "must not be negative"));
    }
    if value > max_amount() {
        return Err(PayrollError::validation(
            field,
            format!("must not exceed {}", max_amount()),
        ));
    }
    Ok(())
}

/// Identity fields supplied when creating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    /// Unique identifier (alphanumeric plus `-` and `_`).
    pub employee_id: String,
    /// Full name (letters and spaces).
    pub name: String,
    /// Contact email.
    pub email: String,
    /// First day of employment.
    pub hire_date: NaiveDate,
}

/// Represents an employee on the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    employee_id: String,
    name: String,
    email: String,
    hire_date: NaiveDate,
    compensation: Compensation,
}

impl Employee {
    /// Validates the supplied fields and creates an employee.
    ///
    /// Validation stops at the first failing field, in the order id, name,
    /// email, hire date, then the compensation amounts. Surrounding
    /// whitespace is trimmed from the text fields before validation.
    ///
    /// Uniqueness across the roster is not checked here; see
    /// [`Roster::add`](crate::roster::Roster::add).
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Compensation, Employee, EmployeeFields};
    /// use payroll_engine::validation::DefaultValidator;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee::create(
    ///     &DefaultValidator,
    ///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    ///     EmployeeFields {
    ///         employee_id: "E-001".to_string(),
    ///         name: "Grace Hopper".to_string(),
    ///         email: "grace@example.com".to_string(),
    ///         hire_date: NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
    ///     },
    ///     Compensation::PartTime { hourly_rate: Decimal::new(2550, 2) },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(employee.calculate_pay(Decimal::new(4, 0)).unwrap(), Decimal::new(10200, 2));
    /// ```
    pub fn create(
        validator: &dyn Validator,
        today: NaiveDate,
        fields: EmployeeFields,
        compensation: Compensation,
    ) -> PayrollResult<Self> {
        let employee_id = fields.employee_id.trim().to_string();
        let name = fields.name.trim().to_string();
        let email = fields.email.trim().to_string();

        if employee_id.is_empty() {
            return Err(PayrollError::validation("employee_id", "must not be empty"));
        }
        if employee_id.chars().count() > MAX_EMPLOYEE_ID_LEN {
            return Err(PayrollError::validation(
                "employee_id",
                format!("must be at most {} characters", MAX_EMPLOYEE_ID_LEN),
            ));
        }
        if !validator.is_valid_employee_id(&employee_id) {
            return Err(PayrollError::validation(
                "employee_id",
                "may only contain letters, digits, '-' and '_'",
            ));
        }

        if name.is_empty() {
            return Err(PayrollError::validation("name", "must not be empty"));
        }
        if !validator.is_valid_name(&name) {
            return Err(PayrollError::validation(
                "name",
                "may only contain letters and spaces",
            ));
        }

        if email.is_empty() {
            return Err(PayrollError::validation("email", "must not be empty"));
        }
        if !validator.is_valid_email(&email) {
            return Err(PayrollError::validation("email", "is not a valid address"));
        }

        if fields.hire_date > today {
            return Err(PayrollError::validation(
                "hire_date",
                "cannot be in the future",
            ));
        }

        compensation.validate()?;

        Ok(Self {
            employee_id,
            name,
            email,
            hire_date: fields.hire_date,
            compensation,
        })
    }

    /// Rebuilds an employee from persisted data without re-validating it.
    pub(crate) fn from_parts(fields: EmployeeFields, compensation: Compensation) -> Self {
        Self {
            employee_id: fields.employee_id,
            name: fields.name,
            email: fields.email,
            hire_date: fields.hire_date,
            compensation,
        }
    }

    /// Returns the employee id.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// Returns the employee's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the employee's email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the hire date.
    pub fn hire_date(&self) -> NaiveDate {
        self.hire_date
    }

    /// Returns how the employee is paid.
    pub fn compensation(&self) -> &Compensation {
        &self.compensation
    }

    /// Returns the employment type.
    pub fn employment_type(&self) -> EmploymentType {
        self.compensation.employment_type()
    }

    /// Computes pay for `hours_worked`.
    ///
    /// Part-time employees earn `hourly_rate × hours_worked`, rounded to
    /// cents. Full-time employees earn their monthly salary regardless of
    /// hours; use [`prorate_salary`](crate::calculation::prorate_salary) for
    /// partial months.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `hours_worked` is negative.
    pub fn calculate_pay(&self, hours_worked: Decimal) -> PayrollResult<Decimal> {
        match &self.compensation {
            Compensation::PartTime { hourly_rate } => {
                calculate_hourly_pay(*hourly_rate, hours_worked)
            }
            Compensation::FullTime { monthly_salary, .. } => {
                if hours_worked.is_sign_negative() && !hours_worked.is_zero() {
                    return Err(PayrollError::InvalidArgument {
                        name: "hours_worked".to_string(),
                        message: "must not be negative".to_string(),
                    });
                }
                Ok(*monthly_salary)
            }
        }
    }
}
