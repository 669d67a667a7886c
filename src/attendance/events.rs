//! Clock events and roster messages delivered to notification sinks.
//!
//! Delivery is synchronous, in emission order, after the triggering change
//! has been committed. A sink cannot fail or undo the change: sinks return
//! nothing, and a sink that panics is contained and logged.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// What happened at the time clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockAction {
    /// A shift was opened.
    ClockIn,
    /// A shift was closed.
    ClockOut,
}

impl fmt::Display for ClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockAction::ClockIn => f.write_str("Clock In"),
            ClockAction::ClockOut => f.write_str("Clock Out"),
        }
    }
}

/// One clock-in or clock-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockEvent {
    /// The employee who clocked in or out.
    pub employee_id: String,
    /// When it happened.
    pub timestamp: NaiveDateTime,
    /// Which transition it was.
    pub action: ClockAction,
}

/// Receives notifications from the ledger and the roster.
pub trait NotificationSink: Send + Sync {
    /// Called after a clock-in or clock-out has been committed.
    fn clock_event(&self, event: &ClockEvent);

    /// Called after the roster changed.
    fn roster_message(&self, _message: &str) {}
}

/// Writes every notification to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn clock_event(&self, event: &ClockEvent) {
        info!(
            employee_id = %event.employee_id,
            timestamp = %event.timestamp,
            action = %event.action,
            "Clock event"
        );
    }

    fn roster_message(&self, message: &str) {
        info!(change = message, "Roster change");
    }
}

/// An ordered list of sinks.
#[derive(Clone, Default)]
pub struct Notifier {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Notifier {
    /// Creates a notifier with no sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sink; sinks are called in subscription order.
    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Number of subscribed sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no sink is subscribed.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Delivers a clock event to every sink.
    pub fn clock_event(&self, event: &ClockEvent) {
        for (index, sink) in self.sinks.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| sink.clock_event(event))).is_err() {
                error!(sink = index, employee_id = %event.employee_id, "Notification sink panicked on clock event");
            }
        }
    }

    /// Delivers a roster message to every sink.
    pub fn roster_message(&self, message: &str) {
        for (index, sink) in self.sinks.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| sink.roster_message(message))).is_err() {
                error!(sink = index, "Notification sink panicked on roster message");
            }
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
