/// Payloads exchanged with the remote ingestion job
///
/// The result shape is owned by the remote service. These types only
/// parse and carry it; nothing here recomputes the counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error marker reported when the trigger call times out
pub const TIMEOUT_ERROR: &str = "timeout";

/// JSON body sent to the ingestion trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRequest {
    pub tenant_id: String,
    pub blob_name: String,
    pub container_name: String,
    /// Only ingest articles relevant to agent/government regulation
    pub abgr_only: bool,
}

/// Article counts reported by the ingestion job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestionSummary {
    pub duration_ms: u64,
    pub total_articles: u64,
    pub transformed: u64,
    pub skipped: u64,
    pub ingested: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub abgr_filtered: bool,
}

/// ABGR relevance statistics reported by the ingestion job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbgrStats {
    pub relevant: u64,
    pub categories: BTreeMap<String, u64>,
    pub agent_types: BTreeMap<String, u64>,
}

/// Outcome of an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionResult {
    pub success: bool,
    pub summary: IngestionSummary,
    pub abgr_stats: AbgrStats,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure marker, e.g. `"timeout"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestionResult {
    /// Result reported when the trigger call did not answer in time
    ///
    /// The remote job may still be running, so this is not a hard failure.
    pub fn timed_out() -> Self {
        Self {
            success: false,
            error: Some(TIMEOUT_ERROR.to_string()),
            message: Some(
                "Request timed out; ingestion may still be processing. Check the ingestion service logs."
                    .to_string(),
            ),
            ..Self::default()
        }
    }

    /// Whether this result is the timeout marker
    pub fn is_timeout(&self) -> bool {
        self.error.as_deref() == Some(TIMEOUT_ERROR)
    }
}
