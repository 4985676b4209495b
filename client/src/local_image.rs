use std::path::Path;

use common_types::{validate_image_file, FileDescriptor, MAX_FILE_SIZE};

use crate::{ClientError, ClientResult};

/// A file read from disk, ready to upload
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub file_name: String,
    /// Declared content type, sent to the API and to storage
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalImage {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads `path`, guessing the content type from its extension
    ///
    /// # Errors
    ///
    /// See [`LocalImage::open`]
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        Self::open(path, None).await
    }

    /// Reads `path` with `content_type`, or the type guessed from its extension.
    ///
    /// Files over the size limit are refused from their metadata, before any
    /// bytes are read.
    ///
    /// # Errors
    ///
    /// - `ClientError::Io` if the file cannot be read
    /// - `ClientError::Validation` if the file is over the size limit
    pub async fn open(path: &Path, content_type: Option<String>) -> ClientResult<Self> {
        let io_error = |source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        };

        let content_type = content_type.unwrap_or_else(|| content_type_for_path(path));

        let size = tokio::fs::metadata(path).await.map_err(io_error)?.len();
        if size > MAX_FILE_SIZE {
            validate_image_file(&FileDescriptor::new(content_type.clone(), size))?;
        }

        let bytes = tokio::fs::read(path).await.map_err(io_error)?;

        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

        Ok(Self::new(file_name, content_type, bytes))
    }

    /// What the validator sees of this file
    #[must_use]
    pub fn descriptor(&self) -> FileDescriptor {
        FileDescriptor::new(self.content_type.clone(), self.bytes.len() as u64)
    }
}

/// Content type for a file name, by extension.
///
/// Unknown extensions map to `application/octet-stream`, which the validator
/// rejects.
#[must_use]
pub fn content_type_for_path(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "pdf" => mime::APPLICATION_PDF,
        "txt" => mime::TEXT_PLAIN,
        _ => mime::APPLICATION_OCTET_STREAM,
    };

    mime.essence_str().to_string()
}
