//! Instance history tracking.
//!
//! Every successful action execution appends one entry. Entries are never
//! removed or reordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed action.
///
/// # Example
///
/// ```rust
/// use waypoint::core::HistoryEntry;
/// use chrono::Utc;
///
/// let entry = HistoryEntry {
///     action_id: "submit".to_string(),
///     from_state: "draft".to_string(),
///     to_state: "review".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(entry.action_id, "submit");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The action that was executed
    pub action_id: String,
    /// The state the instance left
    pub from_state: String,
    /// The state the instance entered
    pub to_state: String,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Append-only, ordered history of an instance.
///
/// `record` returns a new history with the entry added and leaves the
/// receiver untouched.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{History, HistoryEntry};
/// use chrono::Utc;
///
/// let history = History::new();
/// let history = history.record(HistoryEntry {
///     action_id: "a1".to_string(),
///     from_state: "S0".to_string(),
///     to_state: "S1".to_string(),
///     timestamp: Utc::now(),
/// });
/// let history = history.record(HistoryEntry {
///     action_id: "a2".to_string(),
///     from_state: "S1".to_string(),
///     to_state: "S2".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec!["S0", "S1", "S2"]);
/// assert_eq!(history.action_ids(), vec!["a1", "a2"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an entry, returning a new history.
    ///
    /// Copies the existing entries. The engine appends in place instead,
    /// under the instance lock.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// Append in place. Used by the engine while it holds the instance lock.
    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries in execution order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Executed action ids in order.
    pub fn action_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.action_id.as_str()).collect()
    }

    /// States traversed: the first entry's source, then every target.
    ///
    /// Empty when nothing has been executed.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.entries.len() + 1);
        if let Some(first) = self.entries.first() {
            path.push(first.from_state.as_str());
        }
        for entry in &self.entries {
            path.push(entry.to_state.as_str());
        }
        path
    }

    /// Time between the first and the last entry.
    ///
    /// `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
