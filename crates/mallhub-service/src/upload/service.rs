//! Upload storage.
//!
//! Uploads land under `<root>/<image_dir>` or `<root>/<file_dir>` with a
//! fresh uuid file name that keeps the original extension. Nothing is
//! recorded in the relational store.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use mallhub_core::config::UploadConfig;
use mallhub_core::error::{AppError, ErrorKind};
use mallhub_core::result::AppResult;

/// Which upload area a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Image,
    File,
}

impl UploadKind {
    /// Path segment used in resource URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

/// A stored upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadView {
    /// Stored file name.
    pub filename: String,
    /// File name as supplied by the client.
    pub origin: String,
    /// Path the file is served from.
    pub url: String,
}

/// Stores and resolves uploads on the local disk.
#[derive(Debug, Clone)]
pub struct UploadService {
    config: UploadConfig,
}

impl UploadService {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    fn dir(&self, kind: UploadKind) -> PathBuf {
        let sub = match kind {
            UploadKind::Image => &self.config.image_dir,
            UploadKind::File => &self.config.file_dir,
        };
        Path::new(&self.config.path).join(sub)
    }

    fn allowed(&self, kind: UploadKind) -> &[String] {
        match kind {
            UploadKind::Image => &self.config.image_extensions,
            UploadKind::File => &self.config.file_extensions,
        }
    }

    /// Stores `data` and returns where it can be fetched.
    pub async fn save(&self, kind: UploadKind, origin: &str, data: Bytes) -> AppResult<UploadView> {
        if origin.is_empty() {
            return Err(AppError::invalid_params("please choose a file"));
        }
        let ext = Path::new(origin)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|e| self.allowed(kind).iter().any(|a| a == e))
            .ok_or_else(|| AppError::invalid_params("unsupported file type"))?;
        if data.len() as u64 > self.config.max_file_size_bytes {
            return Err(AppError::invalid_params("file too large"));
        }

        let dir = self.dir(kind);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", dir.display()),
                e,
            )
        })?;

        let filename = format!("{}.{ext}", Uuid::new_v4());
        let path = dir.join(&filename);
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to write upload", e)
        })?;

        info!(kind = kind.as_str(), filename = %filename, bytes = data.len(), "Upload stored");
        Ok(UploadView {
            url: format!("/v1/resource/{}/{filename}", kind.as_str()),
            filename,
            origin: origin.to_string(),
        })
    }

    /// Path of a stored upload, or `None` when the name is unsafe or the
    /// file is missing.
    pub async fn resolve(&self, kind: UploadKind, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            debug!(filename, "Rejected upload name");
            return None;
        }
        let path = self.dir(kind).join(filename);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Image path; see [`UploadService::resolve`].
    pub async fn resolve_image(&self, filename: &str) -> Option<PathBuf> {
        self.resolve(UploadKind::Image, filename).await
    }

    /// File path; see [`UploadService::resolve`].
    pub async fn resolve_file(&self, filename: &str) -> Option<PathBuf> {
        self.resolve(UploadKind::File, filename).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(root: &Path) -> UploadService {
        UploadService::new(UploadConfig {
            path: root.to_string_lossy().into_owned(),
            max_file_size_bytes: 16,
            ..UploadConfig::default()
        })
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("mallhub-upload-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_save_then_resolve() {
        let root = temp_root();
        let svc = service(&root);

        let view = svc
            .save(UploadKind::Image, "Photo.PNG", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert!(view.filename.ends_with(".png"));
        assert_eq!(view.origin, "Photo.PNG");
        assert_eq!(view.url, format!("/v1/resource/image/{}", view.filename));

        let path = svc.resolve_image(&view.filename).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png");
        assert!(svc.resolve_file(&view.filename).await.is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejects_bad_extension_and_size() {
        let root = temp_root();
        let svc = service(&root);

        let err = svc
            .save(UploadKind::Image, "run.exe", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "unsupported file type");

        let err = svc
            .save(UploadKind::File, "big.txt", Bytes::from(vec![0u8; 17]))
            .await
            .unwrap_err();
        assert_eq!(err.message, "file too large");
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let svc = service(&temp_root());
        assert!(svc.resolve_file("../secret.txt").await.is_none());
        assert!(svc.resolve_file("a/b.txt").await.is_none());
        assert!(svc.resolve_file("missing.txt").await.is_none());
    }
}
