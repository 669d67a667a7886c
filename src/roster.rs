//! The employee roster.
//!
//! Employees are kept in a single ordered list. A case-insensitive id index
//! is derived from it and rebuilt whenever the list changes shape.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::attendance::{NotificationSink, Notifier};
use crate::error::{PayrollError, PayrollResult};
use crate::models::Employee;

fn identity_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Fails with `Corruption` when two employees share an id or an email,
/// ignoring case.
pub fn check_unique_identities(employees: &[Employee]) -> PayrollResult<()> {
    let mut ids = HashSet::new();
    let mut emails = HashSet::new();
    for employee in employees {
        if !ids.insert(identity_key(employee.employee_id())) {
            return Err(PayrollError::Corruption {
                path: "employees".to_string(),
                message: format!("duplicate employee id '{}'", employee.employee_id()),
            });
        }
        if !emails.insert(identity_key(employee.email())) {
            return Err(PayrollError::Corruption {
                path: "employees".to_string(),
                message: format!("duplicate email '{}'", employee.email()),
            });
        }
    }
    Ok(())
}

/// Every employee known to the process.
#[derive(Debug, Default)]
pub struct Roster {
    employees: Vec<Employee>,
    by_id: HashMap<String, usize>,
    notifier: Notifier,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster from loaded employees.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` when two employees share an id or an email.
    pub fn from_employees(employees: Vec<Employee>) -> PayrollResult<Self> {
        let mut roster = Self::new();
        roster.replace_employees(employees)?;
        Ok(roster)
    }

    /// Replaces every employee, keeping the sinks. On error the roster is
    /// left unchanged.
    pub fn replace_employees(&mut self, employees: Vec<Employee>) -> PayrollResult<()> {
        check_unique_identities(&employees)?;
        self.employees = employees;
        self.rebuild_index();
        debug!(employees = self.employees.len(), "Rebuilt roster");
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.by_id = self
            .employees
            .iter()
            .enumerate()
            .map(|(index, e)| (identity_key(e.employee_id()), index))
            .collect();
    }

    /// Subscribes a sink to roster messages.
    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.notifier.subscribe(sink);
    }

    /// Adds a validated employee.
    ///
    /// # Errors
    ///
    /// - `DuplicateEmployeeId` if the id is taken, ignoring case.
    /// - `DuplicateEmail` if the email is taken, ignoring case.
    pub fn add(&mut self, employee: Employee) -> PayrollResult<()> {
        let key = identity_key(employee.employee_id());
        if self.by_id.contains_key(&key) {
            warn!(employee_id = %employee.employee_id(), "Rejected duplicate employee id");
            return Err(PayrollError::DuplicateEmployeeId {
                employee_id: employee.employee_id().to_string(),
            });
        }

        let email = identity_key(employee.email());
        if self.employees.iter().any(|e| identity_key(e.email()) == email) {
            warn!(employee_id = %employee.employee_id(), "Rejected duplicate email");
            return Err(PayrollError::DuplicateEmail {
                email: employee.email().to_string(),
            });
        }

        let message = format!(
            "Employee {} ({}) added as {}",
            employee.employee_id(),
            employee.name(),
            employee.employment_type()
        );
        self.by_id.insert(key, self.employees.len());
        self.employees.push(employee);
        self.notifier.roster_message(&message);
        Ok(())
    }

    /// Removes the employee with `employee_id` and returns it.
    ///
    /// Their time records stay in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no such employee exists.
    pub fn remove(&mut self, employee_id: &str) -> PayrollResult<Employee> {
        let index = self
            .by_id
            .get(&identity_key(employee_id))
            .copied()
            .ok_or_else(|| PayrollError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;

        let removed = self.employees.remove(index);
        self.rebuild_index();
        self.notifier
            .roster_message(&format!("Employee {} removed", removed.employee_id()));
        Ok(removed)
    }

    /// Looks up an employee by id, ignoring case.
    pub fn get(&self, employee_id: &str) -> Option<&Employee> {
        self.by_id
            .get(&identity_key(employee_id))
            .map(|&index| &self.employees[index])
    }

    /// Looks up an employee by id, failing when absent.
    pub fn require(&self, employee_id: &str) -> PayrollResult<&Employee> {
        self.get(employee_id)
            .ok_or_else(|| PayrollError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// True when an employee with `employee_id` exists.
    pub fn contains(&self, employee_id: &str) -> bool {
        self.by_id.contains_key(&identity_key(employee_id))
    }

    /// Every employee.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// True when the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
