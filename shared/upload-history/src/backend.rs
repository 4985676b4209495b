use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::{HistoryResult, HISTORY_KEY};

/// String-keyed storage slot holding the serialized history
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Returns the stored value, or `None` if nothing has been saved
    async fn load(&self) -> HistoryResult<Option<String>>;

    /// Replaces the stored value
    async fn save(&self, value: &str) -> HistoryResult<()>;

    /// Deletes the stored value; deleting a missing value is not an error
    async fn remove(&self) -> HistoryResult<()>;
}

/// Stores the history as `<dir>/podu_history.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{HISTORY_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryBackend for FileBackend {
    async fn load(&self) -> HistoryResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, value: &str) -> HistoryResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a crash never leaves a half-written file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn remove(&self) -> HistoryResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process backend; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `value`
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Current raw value
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HistoryBackend for MemoryBackend {
    async fn load(&self) -> HistoryResult<Option<String>> {
        Ok(self.raw())
    }

    async fn save(&self, value: &str) -> HistoryResult<()> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }

    async fn remove(&self) -> HistoryResult<()> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested"));

        assert_eq!(backend.load().await.unwrap(), None);

        backend.save("[]").await.unwrap();
        assert_eq!(backend.load().await.unwrap().as_deref(), Some("[]"));
        assert!(backend.path().ends_with("podu_history.json"));

        backend.remove().await.unwrap();
        assert_eq!(backend.load().await.unwrap(), None);

        // Removing twice is fine
        backend.remove().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_backend_clones_share_state() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();

        backend.save("value").await.unwrap();
        assert_eq!(clone.raw().as_deref(), Some("value"));

        clone.remove().await.unwrap();
        assert_eq!(backend.load().await.unwrap(), None);
    }
}
