//! Lifecycle event types for the transfer reconciler
//!
//! This module defines the fixed set of lifecycle stages a transfer can pass
//! through, the normalized event record produced by the ingestors, and the
//! `EventLog` table that the reconciliation pipeline consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transfer identifier
///
/// Opaque, stable identifier assigned by the payment provider. Kept as a
/// string because providers hand out both numeric and alphanumeric ids.
pub type TransferId = String;

/// Lifecycle stages reported by the payment provider
///
/// The declaration order is the merge order used by the timeline merger:
/// `created` is the base projection and every later stage is joined onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Transfer accepted by the provider
    Created,

    /// Transfer handed to the settlement network
    Sending,

    /// Transfer settled successfully
    Success,

    /// Transfer rejected by the settlement network
    ///
    /// The only stage that carries error messages.
    Failed,

    /// Funds of a failed transfer returned to the payer
    Refunded,
}

impl Stage {
    /// All stages in merge order
    pub const ALL: [Stage; 5] = [
        Stage::Created,
        Stage::Sending,
        Stage::Success,
        Stage::Failed,
        Stage::Refunded,
    ];

    /// Lowercase stage name as it appears in provider logs
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Created => "created",
            Stage::Sending => "sending",
            Stage::Success => "success",
            Stage::Failed => "failed",
            Stage::Refunded => "refunded",
        }
    }

    /// Name of this stage's timestamp column in the merged timeline
    ///
    /// The base stage keeps the unsuffixed name, every later stage is
    /// suffixed with its own name (`created_at_sending`, ...).
    pub fn timestamp_column(self) -> String {
        match self {
            Stage::Created => "created_at".to_string(),
            other => format!("created_at_{}", other.as_str()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    /// Parse a stage name, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(Stage::Created),
            "sending" => Ok(Stage::Sending),
            "success" => Ok(Stage::Success),
            "failed" => Ok(Stage::Failed),
            "refunded" => Ok(Stage::Refunded),
            _ => Err(format!("unknown event type '{}'", s.trim())),
        }
    }
}

/// Terminal outcomes used to build the two aggregate cohorts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failed => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized row of the raw lifecycle log
///
/// Produced by the ingestors after validation; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Transfer that emitted the event (non-unique across the log)
    pub transfer_id: TransferId,

    /// Stage the transfer entered
    pub event_type: Stage,

    /// When the provider recorded the event, normalized to UTC
    pub created_at: DateTime<Utc>,

    /// Error messages, only meaningful for `failed` events
    pub errors: Vec<String>,
}

impl EventRecord {
    /// Create an event without error messages
    pub fn new(transfer_id: impl Into<TransferId>, event_type: Stage, created_at: DateTime<Utc>) -> Self {
        Self {
            transfer_id: transfer_id.into(),
            event_type,
            created_at,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_errors<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors = errors.into_iter().map(Into::into).collect();
        self
    }
}

/// Normalized event table
///
/// One row per observed lifecycle event, in the order they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Restrict the log to events recorded on the given UTC day
    ///
    /// Used for end-of-day reports over everything the provider logged that
    /// day. Transfers whose lifecycle straddles midnight keep only the
    /// events that fall inside the window.
    pub fn retain_day(&mut self, day: NaiveDate) {
        self.records
            .retain(|record| record.created_at.date_naive() == day);
    }
}

impl From<Vec<EventRecord>> for EventLog {
    fn from(records: Vec<EventRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<EventRecord> for EventLog {
    fn from_iter<I: IntoIterator<Item = EventRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
