//! Time attendance: the clock-in/clock-out ledger and its notifications.

mod events;
mod ledger;

pub use events::{ClockAction, ClockEvent, NotificationSink, Notifier, TracingSink};
pub use ledger::{AttendanceLedger, check_single_active};
