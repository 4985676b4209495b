use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the history
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// A single uploaded image link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Storage key returned by the upload endpoint
    pub id: String,
    /// Public URL of the image
    pub url: String,
    /// Upload time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Ordered upload history, newest first.
///
/// Holds at most [`MAX_HISTORY_ENTRIES`] entries with unique ids. Both
/// invariants are restored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct UploadHistory {
    entries: Vec<HistoryEntry>,
}

impl UploadHistory {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Puts `entry` at the front.
    ///
    /// An existing entry with the same id is removed first, and the oldest
    /// entry is dropped once the history is full.
    pub fn insert(&mut self, entry: HistoryEntry) {
        self.entries.retain(|existing| existing.id != entry.id);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses persisted JSON, falling back to an empty history when the
    /// stored value is unreadable
    #[must_use]
    pub fn from_json_lossy(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to parse stored history, starting empty: {e}");
                Self::new()
            }
        }
    }
}

impl From<Vec<HistoryEntry>> for UploadHistory {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            if history.entries.len() == MAX_HISTORY_ENTRIES {
                break;
            }
            if !history.entries.iter().any(|e| e.id == entry.id) {
                history.entries.push(entry);
            }
        }
        history
    }
}

impl From<UploadHistory> for Vec<HistoryEntry> {
    fn from(history: UploadHistory) -> Self {
        history.entries
    }
}
