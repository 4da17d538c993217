/// Search capability manifest served at `knowledge://jurisprudence/search`
///
/// Generated locally; no collaborator is consulted.

use serde::Serialize;

/// Search modes the knowledge base supports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCapabilities {
    pub semantic_search: String,
    pub keyword_search: String,
    pub hybrid_search: String,
    pub agent_filtering: String,
    pub citation_extraction: String,
}

impl Default for SearchCapabilities {
    fn default() -> Self {
        Self {
            semantic_search: "Vector-based document similarity".to_string(),
            keyword_search: "Traditional text matching".to_string(),
            hybrid_search: "Combined semantic and keyword".to_string(),
            agent_filtering: "ABGR-specific content focus".to_string(),
            citation_extraction: "Legal reference identification".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchManifest {
    pub search_capabilities: SearchCapabilities,
    pub available_tools: Vec<String>,
}

impl SearchManifest {
    pub fn new(tool_names: &[String]) -> Self {
        Self {
            search_capabilities: SearchCapabilities::default(),
            available_tools: tool_names.to_vec(),
        }
    }
}
