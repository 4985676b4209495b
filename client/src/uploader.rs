use common_types::{validate_image_file, UploadResponse};
use tokio::sync::watch;
use upload_history::{HistoryEntry, HistoryResult, HistoryStore, UploadHistory};

use crate::{ClientError, ClientResult, LocalImage, UploadApi};

/// Where the uploader is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    /// Last upload finished; holds its public URL
    Succeeded { url: String },
    /// Published once when an upload fails, immediately followed by `Idle`
    Failed { error: String },
}

/// Runs uploads one at a time and records finished ones in the history.
///
/// State changes are published on a watch channel, see [`Uploader::subscribe`].
pub struct Uploader<A> {
    api: A,
    history: HistoryStore,
    state: watch::Sender<UploadState>,
}

impl<A: UploadApi> Uploader<A> {
    #[must_use]
    pub fn new(api: A, history: HistoryStore) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            api,
            history,
            state,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Validates `image`, gets a presigned URL, PUTs the bytes and records the link.
    ///
    /// # Errors
    ///
    /// - `ClientError::UploadInProgress` if another upload is running
    /// - `ClientError::Validation` if the file is refused locally; nothing is sent
    /// - any network, API or history error from the later steps
    #[tracing::instrument(skip(self, image), fields(file_name = %image.file_name))]
    pub async fn upload(&self, image: &LocalImage) -> ClientResult<UploadResponse> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == UploadState::Uploading {
                return false;
            }
            *state = UploadState::Uploading;
            true
        });
        if !claimed {
            return Err(ClientError::UploadInProgress);
        }
        let _release = InFlightGuard(&self.state);

        match self.perform(image).await {
            Ok(response) => {
                tracing::info!(key = %response.key, url = %response.url, "Upload complete");
                self.state.send_replace(UploadState::Succeeded {
                    url: response.url.clone(),
                });
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(%error, "Upload failed");
                self.state.send_replace(UploadState::Failed {
                    error: error.to_string(),
                });
                self.state.send_replace(UploadState::Idle);
                Err(error)
            }
        }
    }

    async fn perform(&self, image: &LocalImage) -> ClientResult<UploadResponse> {
        validate_image_file(&image.descriptor())?;

        let response = self.api.request_upload_url(image).await?;
        self.api.put_object(&response.upload_url, image).await?;

        self.history
            .append(HistoryEntry::new(response.key.clone(), response.url.clone()))
            .await?;

        Ok(response)
    }

    /// Returns to `Idle` after a finished upload. No-op while uploading.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| match state {
            UploadState::Idle | UploadState::Uploading => false,
            UploadState::Succeeded { .. } | UploadState::Failed { .. } => {
                *state = UploadState::Idle;
                true
            }
        });
    }

    /// Recent uploads, newest first
    ///
    /// # Errors
    ///
    /// If the history store is unavailable
    pub async fn history(&self) -> HistoryResult<UploadHistory> {
        self.history.load().await
    }

    /// # Errors
    ///
    /// If the history store is unavailable
    pub async fn clear_history(&self) -> HistoryResult<()> {
        self.history.clear().await
    }
}

/// Frees the in-flight slot if an upload future is dropped before it finishes
struct InFlightGuard<'a>(&'a watch::Sender<UploadState>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| {
            if *state != UploadState::Uploading {
                return false;
            }
            *state = UploadState::Idle;
            true
        });
    }
}
