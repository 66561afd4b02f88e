//! Upload storage
//!
//! Writes uploaded document bytes under the media root and hands back an
//! opaque `file_ref` of the form `documents/<name>`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// Subdirectory of the media root holding document uploads
pub const UPLOAD_DIR: &str = "documents";

const FALLBACK_NAME: &str = "upload.bin";

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    sequence: Arc<AtomicU64>,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores `bytes` and returns the new `file_ref`.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.root.join(UPLOAD_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CatalogError::Storage(format!("cannot create {}: {}", dir.display(), e)))?;

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stored_name = format!(
            "{}_{}_{}",
            chrono::Utc::now().format("%Y%m%d%H%M%S%6f"),
            seq,
            sanitize_filename(filename)
        );

        let path = dir.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CatalogError::Storage(format!("cannot write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(format!("{}/{}", UPLOAD_DIR, stored_name))
    }

    /// Best-effort removal of a stored upload.
    pub async fn remove(&self, file_ref: &str) {
        let path = self.path_of(file_ref);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "failed to remove stored upload");
        }
    }

    /// Filesystem location of a `file_ref`.
    pub fn path_of(&self, file_ref: &str) -> PathBuf {
        self.root.join(file_ref)
    }
}

/// Keeps the final path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "doc_catalog_{}_{}_{}",
            tag,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\tmp\\my file.txt"), "my_file.txt");
        assert_eq!(sanitize_filename(""), "upload.bin");
        assert_eq!(sanitize_filename(".."), "upload.bin");
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let storage = FileStorage::new(temp_root("files"));

        let file_ref = storage.save("temp.txt", b"file_content").await.unwrap();
        assert!(file_ref.starts_with("documents/"));
        assert!(file_ref.ends_with("_temp.txt"));

        let stored = tokio::fs::read(storage.path_of(&file_ref)).await.unwrap();
        assert_eq!(stored, b"file_content");

        storage.remove(&file_ref).await;
        assert!(!storage.path_of(&file_ref).exists());

        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_refs() {
        let storage = FileStorage::new(temp_root("dupes"));

        let a = storage.save("same.txt", b"a").await.unwrap();
        let b = storage.save("same.txt", b"b").await.unwrap();
        assert_ne!(a, b);

        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }
}
