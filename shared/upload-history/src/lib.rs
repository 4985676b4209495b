//! Local upload history
//!
//! Keeps the most recent upload links on the client, newest first. All writes
//! go through a single [`HistoryStore`] task so concurrent uploads cannot
//! overwrite each other's entries.

mod backend;
mod error;
mod history;
mod store;

pub use backend::{FileBackend, HistoryBackend, MemoryBackend};
pub use error::{HistoryError, HistoryResult};
pub use history::{HistoryEntry, UploadHistory, MAX_HISTORY_ENTRIES};
pub use store::HistoryStore;

/// Key the serialized history is stored under
pub const HISTORY_KEY: &str = "podu_history";
