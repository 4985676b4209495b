use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::{HistoryBackend, HistoryEntry, HistoryError, HistoryResult, UploadHistory};

/// Pending commands beyond this make callers wait
const COMMAND_QUEUE_CAPACITY: usize = 32;

enum Command {
    Load(oneshot::Sender<HistoryResult<UploadHistory>>),
    Save(UploadHistory, oneshot::Sender<HistoryResult<()>>),
    Append(HistoryEntry, oneshot::Sender<HistoryResult<UploadHistory>>),
    Clear(oneshot::Sender<HistoryResult<()>>),
}

/// Handle to the task that owns the history backend.
///
/// Commands are applied one at a time in arrival order, and every append
/// re-reads the persisted history, so two uploads finishing at the same time
/// both end up in the history. Clones share the same task; the task stops
/// when the last handle is dropped.
#[derive(Clone)]
pub struct HistoryStore {
    commands: mpsc::Sender<Command>,
}

impl HistoryStore {
    /// Spawns the writer task on the current Tokio runtime
    #[must_use]
    pub fn spawn<B>(backend: B) -> Self
    where
        B: HistoryBackend + 'static,
    {
        let (commands, receiver) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        tokio::spawn(run(backend, receiver));
        Self { commands }
    }

    /// Reads the current history
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Io` if the backend cannot be read
    pub async fn load(&self) -> HistoryResult<UploadHistory> {
        self.request(Command::Load).await
    }

    /// Replaces the stored history
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the history cannot be written
    pub async fn save(&self, history: UploadHistory) -> HistoryResult<()> {
        self.request(|reply| Command::Save(history, reply)).await
    }

    /// Adds `entry` to the front and returns the updated history
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the history cannot be read or written
    pub async fn append(&self, entry: HistoryEntry) -> HistoryResult<UploadHistory> {
        self.request(|reply| Command::Append(entry, reply)).await
    }

    /// Deletes every entry
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Io` if the backend cannot be cleared
    pub async fn clear(&self) -> HistoryResult<()> {
        self.request(Command::Clear).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<HistoryResult<T>>) -> Command,
    ) -> HistoryResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| HistoryError::StoreClosed)?;
        response.await.map_err(|_| HistoryError::StoreClosed)?
    }
}

async fn run<B: HistoryBackend>(backend: B, mut receiver: mpsc::Receiver<Command>) {
    while let Some(command) = receiver.recv().await {
        // A dropped reply receiver just means the caller stopped waiting
        match command {
            Command::Load(reply) => {
                let _ = reply.send(read(&backend).await);
            }
            Command::Save(history, reply) => {
                let _ = reply.send(write(&backend, &history).await);
            }
            Command::Append(entry, reply) => {
                let _ = reply.send(append(&backend, entry).await);
            }
            Command::Clear(reply) => {
                let result = backend.remove().await;
                if result.is_ok() {
                    debug!("Upload history cleared");
                }
                let _ = reply.send(result);
            }
        }
    }
    debug!("History store stopped");
}

async fn read<B: HistoryBackend>(backend: &B) -> HistoryResult<UploadHistory> {
    Ok(backend
        .load()
        .await?
        .map(|raw| UploadHistory::from_json_lossy(&raw))
        .unwrap_or_default())
}

async fn write<B: HistoryBackend>(backend: &B, history: &UploadHistory) -> HistoryResult<()> {
    let raw = serde_json::to_string(history)?;
    backend.save(&raw).await
}

async fn append<B: HistoryBackend>(
    backend: &B,
    entry: HistoryEntry,
) -> HistoryResult<UploadHistory> {
    let mut history = read(backend).await?;
    let id = entry.id.clone();
    history.insert(entry);

    if let Err(e) = write(backend, &history).await {
        error!("Failed to persist history entry {id}: {e}");
        return Err(e);
    }

    debug!("Added {id} to upload history ({} entries)", history.len());
    Ok(history)
}
