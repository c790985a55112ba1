//! Storage collaborator for uploaded point images.
//!
//! Registration only needs a filename back; where and how the bytes live
//! is hidden behind [`ImageStore`]. The local-disk implementation writes
//! into the directory that is statically served at `/images`.

use std::path::PathBuf;

use async_trait::async_trait;
use ecopoint_core::error::CoreError;
use ecopoint_core::upload::{sanitize_filename, unique_image_filename};

/// Stores uploaded images and hands back the filename they are served under.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` and return a unique stored filename.
    async fn store(&self, original_name: &str, data: &[u8]) -> Result<String, CoreError>;

    /// Remove a previously stored file. Missing files are not an error.
    async fn remove(&self, filename: &str) -> Result<(), CoreError>;
}

/// [`ImageStore`] backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, original_name: &str, data: &[u8]) -> Result<String, CoreError> {
        let filename = unique_image_filename(original_name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create image directory: {e}")))?;
        tokio::fs::write(self.dir.join(&filename), data)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write image: {e}")))?;

        tracing::debug!(%filename, bytes = data.len(), "Stored point image");
        Ok(filename)
    }

    async fn remove(&self, filename: &str) -> Result<(), CoreError> {
        // Stored names are already sanitized; this keeps removal inside `dir`.
        let path = self.dir.join(sanitize_filename(filename));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to remove image {}: {e}",
                path.display()
            ))),
        }
    }
}
