//! Configuration loading and management for the payroll engine.
//!
//! This module loads the engine configuration from a YAML file: where the
//! roster and ledger files live, and the bounds the attendance ledger applies.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Max shift: {}h", config.config().attendance.max_shift_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AttendanceConfig, PayrollConfig, StorageConfig};
