//! Payroll engine: employee roster, time attendance and pay calculation.
//!
//! This crate keeps employees and their clock-in/clock-out history, persists
//! both to crash-safe files, and computes pay: monthly salaries prorated
//! over arbitrary date ranges and hourly rates applied to recorded hours.
//!
//! The usual entry point is [`book::PayrollBook`], which loads both stores
//! and exposes the roster, the ledger and pay statements.

#![warn(missing_docs)]

pub mod attendance;
pub mod book;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod storage;
pub mod validation;
