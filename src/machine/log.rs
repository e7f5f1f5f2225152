//! Transition log: immutable tracking of interpreter transitions.
//!
//! The log is a plain value: `record` returns a new log with the entry
//! appended, leaving the original untouched.

use crate::core::StatePath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single handled event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The active leaf before the event
    pub from: StatePath,
    /// The active leaf after the event
    pub to: StatePath,
    /// The event that was handled (routing events included)
    pub event: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of handled events.
///
/// # Example
///
/// ```rust
/// use waypoint::machine::{TransitionLog, TransitionRecord};
/// use waypoint::core::StatePath;
/// use chrono::Utc;
///
/// let log = TransitionLog::new();
/// let log = log.record(TransitionRecord {
///     from: StatePath::parse("home"),
///     to: StatePath::parse("about"),
///     event: "GoAbout".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.records().len(), 1);
/// assert_eq!(log.visited().len(), 2); // home -> about
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<TransitionRecord>,
}

impl TransitionLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a transition, returning a new log. The original is
    /// unchanged.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All records in order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The leaf paths visited, in order: the first record's origin, then
    /// each record's destination. Empty when nothing was handled yet.
    pub fn visited(&self) -> Vec<&StatePath> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Elapsed time between the first and last recorded transition, or
    /// `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
