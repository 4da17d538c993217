/// Blob storage for uploaded source documents
///
/// The ingestion job reads its input from a named container. Uploads use
/// overwrite semantics so re-running an ingestion for the same file is
/// always safe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid {kind} name: '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Storage I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid storage endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Blob service returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("Blob service request failed: {0}")]
    Transport(String),
}

/// Trait defining the blob storage interface
///
/// Implemented by the Azure Blob Storage client used for real runs and by a
/// local directory store for offline runs and tests.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Whether the container exists
    async fn container_exists(&self, container: &str) -> Result<bool, StorageError>;

    /// Create the container; succeeds if it already exists
    async fn create_container(&self, container: &str) -> Result<(), StorageError>;

    /// Upload a blob, replacing any existing blob with the same name
    async fn upload_overwrite(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError>;
}

/// Directory-backed blob storage
///
/// Each container is a subdirectory of `root` and each blob a file inside it.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
}

impl LocalBlobStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a container directory
    pub fn container_path(&self, container: &str) -> Result<PathBuf, StorageError> {
        validate_name("container", container)?;
        Ok(self.root.join(container))
    }

    /// Path of a blob file
    pub fn blob_path(&self, container: &str, blob_name: &str) -> Result<PathBuf, StorageError> {
        validate_name("blob", blob_name)?;
        Ok(self.container_path(container)?.join(blob_name))
    }
}

/// Names map to single path components; anything that could escape the root is rejected
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), StorageError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn container_exists(&self, container: &str) -> Result<bool, StorageError> {
        let path = self.container_path(container)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        let path = self.container_path(container)?;
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| StorageError::Io { path, source })
    }

    async fn upload_overwrite(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError> {
        if !self.container_exists(container).await? {
            return Err(StorageError::ContainerNotFound(container.to_string()));
        }

        let path = self.blob_path(container, blob_name)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|source| StorageError::Io { path, source })
    }
}
