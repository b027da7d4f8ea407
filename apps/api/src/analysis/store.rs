//! Transient on-disk home for uploaded documents.
//!
//! Each upload gets a unique path under one shared directory for the
//! lifetime of its request. Paths never collide: a fresh UUID prefix is
//! combined with the original filename, so two simultaneous uploads of
//! `resume.pdf` land in two distinct files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the upload directory if it does not exist yet.
    /// Creating an already-existing directory is not an error.
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await.map_err(AppError::Storage)
    }

    /// Writes one upload to a unique path under the store directory.
    ///
    /// The declared filename is reduced to its final component so a
    /// crafted name cannot escape the directory.
    pub async fn persist(
        &self,
        original_filename: &str,
        content: &[u8],
    ) -> Result<StoredUpload, AppError> {
        self.ensure_dir().await?;

        let basename = Path::new(original_filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");
        let path = self.dir.join(format!("{}-{}", Uuid::new_v4(), basename));

        fs::write(&path, content).await.map_err(AppError::Storage)?;
        debug!("stored {} byte upload at {}", content.len(), path.display());

        Ok(StoredUpload {
            path,
            original_filename: basename.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// One persisted upload, owned by exactly one request.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    original_filename: String,
    created_at: DateTime<Utc>,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Best-effort removal, used by the `delete` retention policy.
    /// A failure here must not fail the request, so it is only logged.
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.path).await {
            warn!("failed to remove stored upload {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_filenames_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let a = store.persist("resume.pdf", b"candidate a").await.unwrap();
        let b = store.persist("resume.pdf", b"candidate b").await.unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(fs::read(a.path()).await.unwrap(), b"candidate a");
        assert_eq!(fs::read(b.path()).await.unwrap(), b"candidate b");
    }

    #[tokio::test]
    async fn persist_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("nested").join("uploads"));

        let stored = store.persist("resume.pdf", b"%PDF-1.4").await.unwrap();
        assert!(stored.path().exists());
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        store.ensure_dir().await.unwrap();
        store.ensure_dir().await.unwrap();
    }

    #[tokio::test]
    async fn path_components_are_stripped_from_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let stored = store
            .persist("../../etc/resume.pdf", b"%PDF-1.4")
            .await
            .unwrap();

        assert_eq!(stored.original_filename(), "resume.pdf");
        assert_eq!(stored.path().parent().unwrap(), dir.path());
    }

    #[tokio::test]
    async fn discard_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let stored = store.persist("resume.pdf", b"%PDF-1.4").await.unwrap();
        let path = stored.path().to_path_buf();
        assert!(path.exists());

        stored.discard().await;
        assert!(!path.exists());
    }
}
