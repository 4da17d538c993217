/// Azure Blob Storage client
///
/// Talks to the Blob service REST API directly: `GET`/`PUT ?restype=container`
/// for the container and a single-shot `PUT` of a block blob for the upload,
/// which replaces any existing blob of the same name.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::ingestion::storage::{validate_name, BlobStorage, StorageError};

/// Blob service REST API version sent with every request
pub const API_VERSION: &str = "2023-11-03";

const VERSION_HEADER: &str = "x-ms-version";
const BLOB_TYPE_HEADER: &str = "x-ms-blob-type";
const ERROR_CODE_HEADER: &str = "x-ms-error-code";

const USER_AGENT: &str = concat!("jurisprudence-mcp/", env!("CARGO_PKG_VERSION"));

/// Blob service endpoint of a storage account
pub fn account_url(storage_account: &str) -> String {
    format!("https://{}.blob.core.windows.net", storage_account)
}

/// How requests to the Blob service are authorized
#[derive(Clone, Default, PartialEq, Eq)]
pub enum BlobCredential {
    /// No authorization (public containers, local emulators)
    #[default]
    Anonymous,
    /// Shared access signature appended to every request URL
    SasToken(String),
    /// Microsoft Entra ID access token for `https://storage.azure.com/`
    BearerToken(String),
}

impl fmt::Debug for BlobCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobCredential::Anonymous => f.write_str("Anonymous"),
            BlobCredential::SasToken(_) => f.write_str("SasToken(<redacted>)"),
            BlobCredential::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
        }
    }
}

/// Blob storage backed by an Azure storage account
#[derive(Debug, Clone)]
pub struct AzureBlobStorage {
    client: Client,
    account_url: String,
    credential: BlobCredential,
}

impl AzureBlobStorage {
    /// Create a client for the account at `account_url`
    pub fn new(
        account_url: impl Into<String>,
        credential: BlobCredential,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            account_url: account_url.into(),
            credential,
        })
    }

    pub fn account_url(&self) -> &str {
        &self.account_url
    }

    fn url(&self, segments: &[&str], container_resource: bool) -> Result<Url, StorageError> {
        let invalid = || StorageError::InvalidEndpoint(self.account_url.clone());

        let mut url = Url::parse(&self.account_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);

        let mut query = Vec::new();
        if container_resource {
            query.push("restype=container");
        }
        if let BlobCredential::SasToken(token) = &self.credential {
            query.push(token.trim_start_matches('?'));
        }
        if !query.is_empty() {
            url.set_query(Some(&query.join("&")));
        }

        Ok(url)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StorageError> {
        let builder = builder.header(VERSION_HEADER, API_VERSION);
        let builder = match &self.credential {
            BlobCredential::BearerToken(token) => builder.bearer_auth(token),
            _ => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))
    }
}

/// Turn an unexpected response into an error carrying the service's error code
async fn failure(response: Response) -> StorageError {
    let status = response.status();
    let code = response
        .headers()
        .get(ERROR_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();

    StorageError::Http {
        status: status.as_u16(),
        detail: error_detail(status, code.as_deref(), &body),
    }
}

fn error_detail(status: StatusCode, code: Option<&str>, body: &str) -> String {
    let body = body.trim();
    match (code, body.is_empty()) {
        (Some(code), false) => format!("{}: {}", code, body),
        (Some(code), true) => code.to_string(),
        (None, false) => body.to_string(),
        (None, true) => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string()),
    }
}

#[async_trait]
impl BlobStorage for AzureBlobStorage {
    async fn container_exists(&self, container: &str) -> Result<bool, StorageError> {
        validate_name("container", container)?;
        let url = self.url(&[container], true)?;

        let response = self.send(self.client.get(url)).await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(failure(response).await),
        }
    }

    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        validate_name("container", container)?;
        let url = self.url(&[container], true)?;

        let response = self.send(self.client.put(url).body(Vec::new())).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            // Created concurrently by someone else
            StatusCode::CONFLICT => Ok(()),
            _ => Err(failure(response).await),
        }
    }

    async fn upload_overwrite(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError> {
        validate_name("container", container)?;
        validate_name("blob", blob_name)?;
        let url = self.url(&[container, blob_name], false)?;

        let request = self
            .client
            .put(url)
            .header(BLOB_TYPE_HEADER, "BlockBlob")
            .body(data);
        let response = self.send(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(response).await)
        }
    }
}
