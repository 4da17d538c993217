/// MCP tools for querying the knowledge base
///
/// This module contains the tools that external clients (like Claude) can
/// call, and the dispatcher that routes a `tools/call` to the right one.

pub mod citations;
pub mod search;
pub mod summary;

// Re-export tool functions for easy access
pub use citations::*;
pub use search::*;
pub use summary::*;

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::{DomainError, ResponseEnvelope, ToolDescriptor, ToolInvocation};
use crate::knowledge::{Collaborators, KnowledgeError};

/// Errors that can occur while executing a tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error("{0}")]
    Collaborator(#[from] KnowledgeError),
}

/// The tools this server knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    SearchJurisprudence,
    ExtractCitations,
    GetAbgrSummary,
}

impl ToolKind {
    /// Every tool, in the order they are advertised
    pub const ALL: [ToolKind; 3] = [
        ToolKind::SearchJurisprudence,
        ToolKind::ExtractCitations,
        ToolKind::GetAbgrSummary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::SearchJurisprudence => "search_jurisprudence",
            ToolKind::ExtractCitations => "extract_citations",
            ToolKind::GetAbgrSummary => "get_abgr_summary",
        }
    }

    /// Resolve a tool name; `None` for anything we don't serve
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "search_jurisprudence" => Some(ToolKind::SearchJurisprudence),
            "extract_citations" => Some(ToolKind::ExtractCitations),
            "get_abgr_summary" => Some(ToolKind::GetAbgrSummary),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::SearchJurisprudence => {
                "Search across jurisprudence articles with semantic matching"
            }
            ToolKind::ExtractCitations => "Extract and validate legal citations from text",
            ToolKind::GetAbgrSummary => {
                "Get summary of agent-related regulations and procedures"
            }
        }
    }

    /// JSON schema generated from the tool's parameter struct
    pub fn input_schema(self) -> Value {
        match self {
            ToolKind::SearchJurisprudence => input_schema::<SearchJurisprudenceParams>(),
            ToolKind::ExtractCitations => input_schema::<ExtractCitationsParams>(),
            ToolKind::GetAbgrSummary => input_schema::<AbgrSummaryParams>(),
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Generate an inline object schema for a parameter struct
///
/// The meta-schema and title are dropped; MCP clients only need the
/// properties, defaults and required set.
pub fn input_schema<P: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|settings| {
            settings.meta_schema = None;
            settings.inline_subschemas = true;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<P>();

    match serde_json::to_value(schema) {
        Ok(Value::Object(mut map)) => {
            map.remove("title");
            Value::Object(map)
        }
        Ok(other) => other,
        Err(e) => {
            error!("Failed to serialize input schema: {}", e);
            serde_json::json!({"type": "object"})
        }
    }
}

/// Routes tool invocations to their handlers
///
/// Every outcome, including validation and collaborator failures, comes
/// back as an envelope; nothing is propagated to the caller.
#[derive(Clone)]
pub struct ToolDispatcher {
    collaborators: Collaborators,
}

impl ToolDispatcher {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Run a tool invocation
    pub async fn call(&self, invocation: &ToolInvocation) -> ResponseEnvelope {
        let Some(kind) = ToolKind::from_name(&invocation.tool_name) else {
            warn!("Unknown tool requested: {}", invocation.tool_name);
            return ResponseEnvelope::text(format!("Unknown tool: {}", invocation.tool_name));
        };

        debug!("Calling tool {}", kind.name());

        let result = match kind {
            ToolKind::SearchJurisprudence => self.call_search_jurisprudence(invocation).await,
            ToolKind::ExtractCitations => self.call_extract_citations(invocation).await,
            ToolKind::GetAbgrSummary => self.call_get_abgr_summary(invocation).await,
        };

        match result {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Error calling tool {}: {}", kind.name(), e);
                ResponseEnvelope::error(e)
            }
        }
    }

    /// Call the search_jurisprudence tool
    async fn call_search_jurisprudence(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ResponseEnvelope, ToolError> {
        let params: SearchJurisprudenceParams = invocation.parse_arguments()?;
        let response = search_jurisprudence(self.collaborators.search.as_ref(), params).await?;
        Ok(ResponseEnvelope::json(&response))
    }

    /// Call the extract_citations tool
    async fn call_extract_citations(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ResponseEnvelope, ToolError> {
        let params: ExtractCitationsParams = invocation.parse_arguments()?;
        let response = extract_citations(self.collaborators.citations.as_ref(), params).await?;
        Ok(ResponseEnvelope::json(&response))
    }

    /// Call the get_abgr_summary tool
    async fn call_get_abgr_summary(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<ResponseEnvelope, ToolError> {
        let params: AbgrSummaryParams = invocation.parse_arguments()?;
        let response = get_abgr_summary(self.collaborators.summarizer.as_ref(), params).await?;
        Ok(ResponseEnvelope::json(&response))
    }
}
