/// Tool for searching the jurisprudence corpus
///
/// This module implements the search_jurisprudence MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::knowledge::{RankedDocument, SearchEngine, SearchQuery};
use crate::tools::{ToolError, ToolKind};

/// Default cap on the number of results
pub const DEFAULT_MAX_RESULTS: u32 = 5;

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

/// Parameters for searching jurisprudence articles
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchJurisprudenceParams {
    /// Search query for legal content
    #[schemars(length(min = 1), regex(pattern = r"\S"))]
    pub query: String,
    /// Focus on agent-related (ABGR) content
    #[serde(default)]
    pub agent_focus: bool,
    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// Response from a jurisprudence search
#[derive(Debug, Serialize)]
pub struct SearchJurisprudenceResponse {
    pub query: String,
    pub agent_focus: bool,
    pub results: Vec<RankedDocument>,
    pub total_found: usize,
}

/// Search the corpus using the provided engine
///
/// The cap and the agent-focus flag are enforced here as well, so an engine
/// that over-delivers cannot break the response contract.
pub async fn search_jurisprudence(
    engine: &dyn SearchEngine,
    params: SearchJurisprudenceParams,
) -> Result<SearchJurisprudenceResponse, ToolError> {
    if params.query.trim().is_empty() {
        return Err(DomainError::InvalidArguments {
            tool: ToolKind::SearchJurisprudence.name().to_string(),
            message: "query cannot be empty".to_string(),
        }
        .into());
    }

    let max_results = params.max_results as usize;
    let query = SearchQuery {
        query: params.query.clone(),
        agent_focus: params.agent_focus,
        max_results,
    };

    let mut results = engine.search(&query).await?;
    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    results.truncate(max_results);
    for document in &mut results {
        document.abgr_related = params.agent_focus;
    }

    tracing::debug!(
        query = %params.query,
        agent_focus = params.agent_focus,
        found = results.len(),
        "jurisprudence search complete"
    );

    Ok(SearchJurisprudenceResponse {
        query: params.query,
        agent_focus: params.agent_focus,
        total_found: results.len(),
        results,
    })
}
