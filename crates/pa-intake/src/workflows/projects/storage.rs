//! Where uploaded document bytes are kept.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use super::domain::file_extension;

/// Extensions accepted by the document upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "jpg", "jpeg", "png"];

pub fn is_allowed_upload(file_name: &str) -> bool {
    file_extension(file_name)
        .map(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()))
        .unwrap_or(false)
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("`{0}` does not name a file")]
    InvalidName(String),
    #[error("upload storage failed: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist the bytes and return the path recorded on the document.
    async fn store(&self, original_name: &str, contents: &[u8]) -> Result<String, StorageError>;
    /// Returns `false` when nothing existed at `file_path`.
    async fn remove(&self, file_path: &str) -> Result<bool, StorageError>;
}

/// Files under a local directory, named `<unix millis>_<original base name>`.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    root: PathBuf,
}

impl LocalUploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn base_name(original_name: &str) -> Option<&str> {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, original_name: &str, contents: &[u8]) -> Result<String, StorageError> {
        let base = base_name(original_name)
            .ok_or_else(|| StorageError::InvalidName(original_name.to_string()))?;
        let path = self
            .root
            .join(format!("{}_{}", Utc::now().timestamp_millis(), base));

        fs::create_dir_all(&self.root).await?;
        fs::write(&path, contents).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, file_path: &str) -> Result<bool, StorageError> {
        match fs::remove_file(file_path).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }
}
