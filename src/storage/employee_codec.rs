//! JSON encoding of the roster.
//!
//! The file is a pretty-printed array. Each object carries a `Type`
//! discriminator (`"FullTime"` or `"PartTime"`) as its first field. Records
//! written before the discriminator existed are resolved from the fields
//! they carry: `MonthlySalary` means full-time, `HourlyRate` means part-time.
//!
//! ```json
//! [
//!   {
//!     "Type": "FullTime",
//!     "EmployeeId": "E-001",
//!     "Name": "Grace Hopper",
//!     "Email": "grace@example.com",
//!     "HireDate": "2020-01-06T00:00:00",
//!     "MonthlySalary": 3000.00,
//!     "OvertimeRate": 25.00
//!   }
//! ]
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::durable::RecordCodec;
use super::jsonc;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{Compensation, Employee, EmployeeFields, EmploymentType};
use crate::roster::check_unique_identities;

const TYPE_FIELD: &str = "Type";
const MONTHLY_SALARY_FIELD: &str = "MonthlySalary";
const HOURLY_RATE_FIELD: &str = "HourlyRate";

/// Reads and writes the employee roster as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeJsonCodec;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EmployeeRecord {
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    employee_id: String,
    name: String,
    email: String,
    #[serde(with = "hire_date")]
    hire_date: NaiveDate,
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    monthly_salary: Option<Decimal>,
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    overtime_rate: Option<Decimal>,
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    hourly_rate: Option<Decimal>,
}

impl From<&Employee> for EmployeeRecord {
    fn from(employee: &Employee) -> Self {
        let (monthly_salary, overtime_rate, hourly_rate) = match employee.compensation() {
            Compensation::FullTime {
                monthly_salary,
                overtime_rate,
            } => (Some(*monthly_salary), Some(*overtime_rate), None),
            Compensation::PartTime { hourly_rate } => (None, None, Some(*hourly_rate)),
        };

        Self {
            kind: Some(employee.employment_type().as_str().to_string()),
            employee_id: employee.employee_id().to_string(),
            name: employee.name().to_string(),
            email: employee.email().to_string(),
            hire_date: employee.hire_date(),
            monthly_salary,
            overtime_rate,
            hourly_rate,
        }
    }
}

impl EmployeeRecord {
    fn into_employee(self, source: &str, variant: EmploymentType) -> PayrollResult<Employee> {
        let compensation = match variant {
            EmploymentType::FullTime => Compensation::FullTime {
                monthly_salary: self
                    .monthly_salary
                    .ok_or_else(|| missing_field(source, &self.employee_id, MONTHLY_SALARY_FIELD))?,
                overtime_rate: self.overtime_rate.unwrap_or(Decimal::ZERO),
            },
            EmploymentType::PartTime => Compensation::PartTime {
                hourly_rate: self
                    .hourly_rate
                    .ok_or_else(|| missing_field(source, &self.employee_id, HOURLY_RATE_FIELD))?,
            },
        };

        Ok(Employee::from_parts(
            EmployeeFields {
                employee_id: self.employee_id,
                name: self.name,
                email: self.email,
                hire_date: self.hire_date,
            },
            compensation,
        ))
    }
}

fn missing_field(source: &str, employee_id: &str, field: &str) -> PayrollError {
    PayrollError::Corruption {
        path: source.to_string(),
        message: format!("employee '{}' has no {}", employee_id, field),
    }
}

/// Picks the variant for one stored object.
fn resolve_variant(object: &Map<String, Value>) -> PayrollResult<EmploymentType> {
    match object.get(TYPE_FIELD) {
        Some(Value::String(tag)) => match tag.as_str() {
            "FullTime" => Ok(EmploymentType::FullTime),
            "PartTime" => Ok(EmploymentType::PartTime),
            other => Err(PayrollError::UnknownVariant {
                found: other.to_string(),
            }),
        },
        Some(Value::Null) | None => {
            if object.contains_key(MONTHLY_SALARY_FIELD) {
                Ok(EmploymentType::FullTime)
            } else if object.contains_key(HOURLY_RATE_FIELD) {
                Ok(EmploymentType::PartTime)
            } else {
                Err(PayrollError::UnknownVariant {
                    found: "record without Type, MonthlySalary or HourlyRate".to_string(),
                })
            }
        }
        Some(other) => Err(PayrollError::UnknownVariant {
            found: other.to_string(),
        }),
    }
}

impl RecordCodec for EmployeeJsonCodec {
    type Item = Employee;

    fn encode(&self, items: &[Employee]) -> PayrollResult<String> {
        let records: Vec<EmployeeRecord> = items.iter().map(EmployeeRecord::from).collect();
        serde_json::to_string_pretty(&records).map_err(|e| PayrollError::Corruption {
            path: "employees".to_string(),
            message: format!("failed to encode: {}", e),
        })
    }

    fn decode(&self, source: &str, content: &str) -> PayrollResult<Vec<Employee>> {
        let corrupt = |message: String| PayrollError::Corruption {
            path: source.to_string(),
            message,
        };

        let values: Vec<Value> =
            serde_json::from_str(&jsonc::sanitize(content)).map_err(|e| corrupt(e.to_string()))?;

        let mut employees = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let Value::Object(object) = &value else {
                return Err(corrupt(format!("entry {} is not an object", index)));
            };
            let variant = resolve_variant(object)?;
            let record: EmployeeRecord = serde_json::from_value(value)
                .map_err(|e| corrupt(format!("entry {}: {}", index, e)))?;
            employees.push(record.into_employee(source, variant)?);
        }

        check_unique_identities(&employees)?;
        Ok(employees)
    }
}

/// Hire dates are written as a midnight timestamp and read either that way
/// or as a bare date.
mod hire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const WRITE_FORMAT: &str = "%Y-%m-%dT00:00:00";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(WRITE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let date_part = raw
            .get(..10)
            .ok_or_else(|| D::Error::custom(format!("invalid hire date '{}'", raw)))?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("invalid hire date '{}': {}", raw, e)))
    }
}

/// Amounts are written as JSON numbers carrying the exact decimal text
/// (scale included) and read from numbers or strings without passing
/// through `f64`.
mod amount {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use serde_json::{Number, Value};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => {
                let number = Number::from_str(&amount.to_string())
                    .map_err(|e| <S::Error as ser::Error>::custom(format!("amount {}: {}", amount, e)))?;
                serializer.serialize_some(&number)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        let text = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(de::Error::custom(format!("expected an amount, found {}", other)));
            }
        };
        parse_exact(text.trim())
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid amount '{}': {}", text, e)))
    }

    fn parse_exact(text: &str) -> Result<Decimal, rust_decimal::Error> {
        if text.contains(['e', 'E']) {
            Decimal::from_scientific(text)
        } else {
            Decimal::from_str_exact(text)
        }
    }
}
