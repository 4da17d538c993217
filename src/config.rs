/// Resolved configuration for the server and the ingestion client
///
/// The binaries fill these from command line flags with environment
/// variable fallbacks; library code only ever sees the resolved values.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::ingestion::{
    account_url, AzureBlobStorage, BlobCredential, BlobStorage, HttpIngestionTrigger,
    IngestionClient, IngestionError, LocalBlobStorage,
};

/// Default corpus file served at `knowledge://jurisprudence/all`
pub const DEFAULT_KNOWLEDGE_BASE: &str = "knowledge_articles_r2r3_en.xml";
/// Default storage account receiving uploads
pub const DEFAULT_STORAGE_ACCOUNT: &str = "evafoundationstorage";
/// Default container holding uploaded source documents
pub const DEFAULT_CONTAINER: &str = "knowledge-sources";
/// Default function app hosting the ingestion endpoint
pub const DEFAULT_FUNCTION_APP: &str = "eva-foundation-functions";
pub const DEFAULT_TENANT_ID: &str = "government-canada";
/// Large files take a while to ingest
pub const DEFAULT_TRIGGER_TIMEOUT_SECS: u64 = 300;

/// Configuration for the MCP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Path of the corpus file
    pub knowledge_base_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: PathBuf::from(DEFAULT_KNOWLEDGE_BASE),
        }
    }
}

/// Where uploaded source documents are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobStoreConfig {
    /// An Azure storage account, read by the remote ingestion job
    Azure {
        account_url: String,
        credential: BlobCredential,
    },
    /// A local directory, for offline runs
    Local { root: PathBuf },
}

impl BlobStoreConfig {
    /// Azure store for `storage_account` at its public endpoint
    pub fn azure(storage_account: &str, credential: BlobCredential) -> Self {
        BlobStoreConfig::Azure {
            account_url: account_url(storage_account),
            credential,
        }
    }

    /// Human-readable location for log and console output
    pub fn describe(&self) -> String {
        match self {
            BlobStoreConfig::Azure { account_url, .. } => account_url.clone(),
            BlobStoreConfig::Local { root } => format!("local directory {}", root.display()),
        }
    }
}

/// Configuration for an ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionConfig {
    pub blob_store: BlobStoreConfig,
    pub container_name: String,
    pub function_url: String,
    pub function_key: String,
    pub tenant_id: String,
    /// Bound on each HTTP call (upload and trigger)
    pub request_timeout: Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            blob_store: BlobStoreConfig::azure(DEFAULT_STORAGE_ACCOUNT, BlobCredential::Anonymous),
            container_name: DEFAULT_CONTAINER.to_string(),
            function_url: function_url_for_app(DEFAULT_FUNCTION_APP),
            function_key: String::new(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TRIGGER_TIMEOUT_SECS),
        }
    }
}

impl IngestionConfig {
    /// Build a client backed by the configured blob store and the HTTP trigger
    pub fn build_client(&self) -> Result<IngestionClient, IngestionError> {
        let storage: Arc<dyn BlobStorage> = match &self.blob_store {
            BlobStoreConfig::Azure {
                account_url,
                credential,
            } => Arc::new(AzureBlobStorage::new(
                account_url.as_str(),
                credential.clone(),
                self.request_timeout,
            )?),
            BlobStoreConfig::Local { root } => Arc::new(LocalBlobStorage::new(root)),
        };
        let trigger = HttpIngestionTrigger::new(
            &self.function_url,
            &self.function_key,
            self.request_timeout,
        )?;

        Ok(IngestionClient::new(
            storage,
            Arc::new(trigger),
            &self.container_name,
        ))
    }
}

/// Ingestion endpoint of a function app
pub fn function_url_for_app(function_app: &str) -> String {
    format!("https://{}.azurewebsites.net/api/knowledge-ingestion", function_app)
}

/// Default blob store location
///
/// Prefers the platform data directory and falls back to the temp dir.
pub fn default_storage_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("jurisprudence-mcp")
        .join("blobs")
}
