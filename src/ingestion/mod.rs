/// Ingestion client for the knowledge base
///
/// Uploads a source document to blob storage, triggers the remote ingestion
/// job and hands back its structured outcome. The steps run strictly in
/// order and are never retried; the caller decides whether to re-run.

pub mod analyze;
pub mod azure;
pub mod report;
pub mod storage;
pub mod trigger;

// Re-export the main ingestion types
pub use analyze::{analyze_xml, analyze_xml_file, render_outline, XmlOutline};
pub use azure::{account_url, AzureBlobStorage, BlobCredential};
pub use report::render_summary;
pub use storage::{validate_name, BlobStorage, LocalBlobStorage, StorageError};
pub use trigger::{HttpIngestionTrigger, IngestionTrigger, TriggerError};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn, Instrument, Span};
use uuid::Uuid;

use crate::domain::{IngestionRequest, IngestionResult};

/// Errors that can occur during an ingestion run
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("XML file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Cannot derive a blob name from {}", path.display())]
    InvalidPath { path: PathBuf },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Trigger error: {0}")]
    Trigger(#[from] TriggerError),

    #[error("XML analysis error: {0}")]
    Analysis(String),
}

/// Record of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub container: String,
    pub blob_name: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Orchestrates upload and trigger against the storage and trigger collaborators
#[derive(Clone)]
pub struct IngestionClient {
    storage: Arc<dyn BlobStorage>,
    trigger: Arc<dyn IngestionTrigger>,
    container_name: String,
}

impl IngestionClient {
    pub fn new(
        storage: Arc<dyn BlobStorage>,
        trigger: Arc<dyn IngestionTrigger>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            trigger,
            container_name: container_name.into(),
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Upload `file_path`, then trigger ingestion of the uploaded blob
    ///
    /// A trigger timeout is reported as a result with `error = "timeout"`,
    /// because the remote job may already be running. Missing files,
    /// storage failures and HTTP errors are returned as errors.
    pub async fn ingest(
        &self,
        file_path: &Path,
        tenant_id: &str,
        abgr_only: bool,
        blob_name_override: Option<&str>,
    ) -> Result<IngestionResult, IngestionError> {
        async {
            let receipt = self.upload(file_path, blob_name_override).await?;
            self.trigger(&receipt.blob_name, tenant_id, abgr_only).await
        }
        .instrument(self.run_span(tenant_id))
        .await
    }

    /// Span tagging every log line of one ingestion run with a fresh run id
    pub fn run_span(&self, tenant_id: &str) -> Span {
        let run_id = Uuid::new_v4();
        tracing::info_span!("ingestion", %run_id, tenant_id, container = %self.container_name)
    }

    /// Upload a local file with overwrite semantics, creating the container if needed
    pub async fn upload(
        &self,
        file_path: &Path,
        blob_name_override: Option<&str>,
    ) -> Result<UploadReceipt, IngestionError> {
        let exists = tokio::fs::try_exists(file_path)
            .await
            .map_err(|source| IngestionError::Io {
                path: file_path.to_path_buf(),
                source,
            })?;
        if !exists {
            return Err(IngestionError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        let blob_name = match blob_name_override {
            Some(name) => name.to_string(),
            None => file_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| IngestionError::InvalidPath {
                    path: file_path.to_path_buf(),
                })?,
        };

        validate_name("container", &self.container_name)?;
        validate_name("blob", &blob_name)?;

        info!("Uploading {} to blob storage", file_path.display());

        if !self.storage.container_exists(&self.container_name).await? {
            info!("Creating container: {}", self.container_name);
            self.storage.create_container(&self.container_name).await?;
        }

        let data = tokio::fs::read(file_path)
            .await
            .map_err(|source| IngestionError::Io {
                path: file_path.to_path_buf(),
                source,
            })?;
        let size_bytes = data.len() as u64;
        info!(
            "File size: {} bytes ({:.2} MB)",
            size_bytes,
            size_bytes as f64 / 1024.0 / 1024.0
        );

        self.storage
            .upload_overwrite(&self.container_name, &blob_name, data)
            .await?;

        info!("Uploaded to: {}/{}", self.container_name, blob_name);

        Ok(UploadReceipt {
            container: self.container_name.clone(),
            blob_name,
            size_bytes,
            uploaded_at: Utc::now(),
        })
    }

    /// Trigger ingestion of a blob that is already uploaded
    pub async fn trigger(
        &self,
        blob_name: &str,
        tenant_id: &str,
        abgr_only: bool,
    ) -> Result<IngestionResult, IngestionError> {
        let request = IngestionRequest {
            tenant_id: tenant_id.to_string(),
            blob_name: blob_name.to_string(),
            container_name: self.container_name.clone(),
            abgr_only,
        };

        info!(
            blob = %request.blob_name,
            container = %request.container_name,
            abgr_only,
            "Triggering ingestion function"
        );

        match self.trigger.trigger(&request).await {
            Ok(result) => Ok(result),
            Err(TriggerError::Timeout(after)) => {
                warn!(
                    "Ingestion trigger timed out after {:?} (ingestion may still be processing)",
                    after
                );
                Ok(IngestionResult::timed_out())
            }
            Err(e) => {
                error!("Ingestion trigger failed: {}", e);
                Err(e.into())
            }
        }
    }
}
