//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every field has a
//! default so a partial file (or no file at all) yields a usable config.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

use crate::models::default_max_shift_hours;

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_employees_file() -> String {
    "employees.json".to_string()
}

fn default_time_records_file() -> String {
    "timerecords.txt".to_string()
}

fn default_clock_skew_seconds() -> i64 {
    60
}

/// Where the roster and ledger files live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding both data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the employee roster (JSON).
    #[serde(default = "default_employees_file")]
    pub employees_file: String,
    /// File name of the time-record ledger (delimited text).
    #[serde(default = "default_time_records_file")]
    pub time_records_file: String,
}

impl StorageConfig {
    /// Full path of the employee roster file.
    pub fn employees_path(&self) -> PathBuf {
        self.data_dir.join(&self.employees_file)
    }

    /// Full path of the time-record ledger file.
    pub fn time_records_path(&self) -> PathBuf {
        self.data_dir.join(&self.time_records_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            employees_file: default_employees_file(),
            time_records_file: default_time_records_file(),
        }
    }
}

/// Bounds applied by the attendance ledger.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceConfig {
    /// Upper bound on the hours credited to a single closed record.
    #[serde(default = "default_max_shift_hours")]
    pub max_shift_hours: Decimal,
    /// How far in the future a clock-in may lie before it is rejected.
    #[serde(default = "default_clock_skew_seconds")]
    pub clock_skew_seconds: i64,
}

impl AttendanceConfig {
    /// The clock-skew tolerance as a duration.
    pub fn clock_skew(&self) -> Duration {
        Duration::seconds(self.clock_skew_seconds)
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            max_shift_hours: default_max_shift_hours(),
            clock_skew_seconds: default_clock_skew_seconds(),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PayrollConfig {
    /// Storage locations.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Attendance ledger bounds.
    #[serde(default)]
    pub attendance: AttendanceConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PayrollConfig::default();
        assert_eq!(config.storage.employees_path(), PathBuf::from("data/employees.json"));
        assert_eq!(
            config.storage.time_records_path(),
            PathBuf::from("data/timerecords.txt")
        );
        assert_eq!(config.attendance.max_shift_hours, Decimal::new(72, 0));
        assert_eq!(config.attendance.clock_skew(), Duration::minutes(1));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "storage:\n  data_dir: /var/lib/payroll\n";
        let config: PayrollConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.storage.employees_path(),
            PathBuf::from("/var/lib/payroll/employees.json")
        );
        assert_eq!(config.attendance, AttendanceConfig::default());
    }
}
