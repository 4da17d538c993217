/// HTTP trigger for the remote ingestion job
///
/// Posts an [`IngestionRequest`] to the ingestion function and parses the
/// structured result. Every call is bounded by an explicit timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{IngestionRequest, IngestionResult};

/// Header carrying the function access key
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// User-Agent string for trigger requests
const USER_AGENT: &str = concat!("jurisprudence-mcp/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while triggering ingestion
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("ingestion trigger timed out after {0:?}")]
    Timeout(Duration),

    #[error("ingestion trigger returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("ingestion trigger request failed: {0}")]
    Transport(String),

    #[error("invalid ingestion response: {0}")]
    Decode(String),
}

/// Trait defining how an ingestion job is started
#[async_trait]
pub trait IngestionTrigger: Send + Sync {
    async fn trigger(&self, request: &IngestionRequest) -> Result<IngestionResult, TriggerError>;
}

/// Triggers ingestion by POSTing JSON to an HTTP function
#[derive(Debug, Clone)]
pub struct HttpIngestionTrigger {
    client: Client,
    url: String,
    function_key: String,
    timeout: Duration,
}

impl HttpIngestionTrigger {
    /// Create a trigger for `url`, authenticated with `function_key`
    pub fn new(
        url: impl Into<String>,
        function_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TriggerError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TriggerError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            function_key: function_key.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, error: reqwest::Error) -> TriggerError {
        if error.is_timeout() {
            TriggerError::Timeout(self.timeout)
        } else {
            TriggerError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl IngestionTrigger for HttpIngestionTrigger {
    async fn trigger(&self, request: &IngestionRequest) -> Result<IngestionResult, TriggerError> {
        let mut builder = self.client.post(&self.url).json(request);
        if !self.function_key.is_empty() {
            builder = builder.header(FUNCTION_KEY_HEADER, &self.function_key);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriggerError::Http {
                status: status.as_u16(),
                detail: error_detail(status, &body),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&body).map_err(|e| TriggerError::Decode(e.to_string()))
    }
}

/// Structured bodies are pretty-printed verbatim; otherwise the raw text, then the status text
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(structured) = serde_json::from_str::<Value>(body) {
        if let Ok(pretty) = serde_json::to_string_pretty(&structured) {
            return pretty;
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
