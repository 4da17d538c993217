/// Tool for summarizing agent-related (ABGR) regulations
///
/// This module implements the get_abgr_summary MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::knowledge::{AbgrSummarizer, AbgrSummary, AbgrTopic};
use crate::tools::ToolError;

/// Attribution attached to every ABGR summary
pub const KNOWLEDGE_SOURCE: &str = "AssistMe Jurisprudence Database";

fn default_topic() -> String {
    AbgrTopic::ALL.to_string()
}

/// Parameters for an ABGR summary
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AbgrSummaryParams {
    /// Specific ABGR topic or 'all' for general summary
    #[serde(default = "default_topic")]
    pub topic: String,
}

/// Response from summarizing ABGR content
#[derive(Debug, Serialize)]
pub struct AbgrSummaryResponse {
    pub topic: String,
    pub abgr_summary: AbgrSummary,
    pub knowledge_source: String,
}

/// Summarize ABGR content using the provided summarizer
pub async fn get_abgr_summary(
    summarizer: &dyn AbgrSummarizer,
    params: AbgrSummaryParams,
) -> Result<AbgrSummaryResponse, ToolError> {
    let abgr_summary = summarizer
        .summarize(&AbgrTopic::parse(&params.topic))
        .await?;

    Ok(AbgrSummaryResponse {
        topic: params.topic,
        abgr_summary,
        knowledge_source: KNOWLEDGE_SOURCE.to_string(),
    })
}
