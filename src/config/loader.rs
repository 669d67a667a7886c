//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PayrollError, PayrollResult};
use crate::models::default_max_shift_hours;

use super::types::PayrollConfig;

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// println!("Employees file: {}", loader.config().storage.employees_path().display());
/// # Ok::<(), payroll_engine::error::PayrollError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable (`ConfigNotFound`)
    /// - The file contains invalid YAML or mistyped fields (`ConfigParseError`)
    /// - The attendance bounds are negative, or the shift cap exceeds 72
    ///   hours (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content).map_err(|message| PayrollError::ConfigParseError {
            path: path_str.clone(),
            message,
        })?;

        debug!(path = %path_str, "Loaded payroll configuration");
        Ok(Self { config })
    }

    /// Loads configuration from `path` when given, or falls back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> PayrollResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn parse(content: &str) -> Result<PayrollConfig, String> {
        // An empty document deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(PayrollConfig::default());
        }

        let config: PayrollConfig = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

        if config.attendance.max_shift_hours.is_sign_negative() {
            return Err("attendance.max_shift_hours must not be negative".to_string());
        }
        if config.attendance.max_shift_hours > default_max_shift_hours() {
            return Err(format!(
                "attendance.max_shift_hours must not exceed {}",
                default_max_shift_hours()
            ));
        }
        if config.attendance.clock_skew_seconds < 0 {
            return Err("attendance.clock_skew_seconds must not be negative".to_string());
        }

        Ok(config)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}
