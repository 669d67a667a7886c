//! Durable file storage for the roster and the attendance ledger.
//!
//! Each collection lives in its own file and is always written whole.
//! [`DurableStore`] provides atomic replace and backup recovery; the codecs
//! provide the two on-disk formats.

mod durable;
mod employee_codec;
mod jsonc;
mod time_record_codec;

pub use durable::{DurableStore, LoadOutcome, Loaded, RecordCodec};
pub use employee_codec::EmployeeJsonCodec;
pub use time_record_codec::TimeRecordLineCodec;

/// Store for the employee roster.
pub type EmployeeStore = DurableStore<EmployeeJsonCodec>;

/// Store for the attendance ledger.
pub type TimeRecordStore = DurableStore<TimeRecordLineCodec>;
