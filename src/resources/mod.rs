/// MCP resources exposing the knowledge base
///
/// This module resolves resource URIs to content. Each known URI maps to a
/// read strategy; anything else resolves to a descriptive text body.

pub mod manifest;

pub use manifest::*;

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::domain::{ResourceDescriptor, ResponseEnvelope};
use crate::knowledge::{Collaborators, KnowledgeError};

/// MIME type used for bodies that aren't one of the known resources
pub const FALLBACK_MIME_TYPE: &str = "text/plain";

/// The resources this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnowledgeResource {
    /// The full jurisprudence corpus
    Corpus,
    /// Agent-related (ABGR) content extracted from the corpus
    Abgr,
    /// Description of the search capabilities
    SearchManifest,
}

impl KnowledgeResource {
    /// Every resource, in the order they are advertised
    pub const ALL: [KnowledgeResource; 3] = [
        KnowledgeResource::Corpus,
        KnowledgeResource::Abgr,
        KnowledgeResource::SearchManifest,
    ];

    pub fn uri(self) -> &'static str {
        match self {
            KnowledgeResource::Corpus => "knowledge://jurisprudence/all",
            KnowledgeResource::Abgr => "knowledge://jurisprudence/abgr",
            KnowledgeResource::SearchManifest => "knowledge://jurisprudence/search",
        }
    }

    /// Resolve a URI by exact match; `None` for anything we don't serve
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "knowledge://jurisprudence/all" => Some(KnowledgeResource::Corpus),
            "knowledge://jurisprudence/abgr" => Some(KnowledgeResource::Abgr),
            "knowledge://jurisprudence/search" => Some(KnowledgeResource::SearchManifest),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            KnowledgeResource::Corpus => "application/xml",
            KnowledgeResource::Abgr | KnowledgeResource::SearchManifest => "application/json",
        }
    }

    pub fn descriptor(self) -> ResourceDescriptor {
        let (name, description) = match self {
            KnowledgeResource::Corpus => (
                "Complete Jurisprudence Database",
                "Full AssistMe legal knowledge base",
            ),
            KnowledgeResource::Abgr => (
                "Agent-Related Content (ABGR)",
                "Government agent regulations and procedures",
            ),
            KnowledgeResource::SearchManifest => (
                "Semantic Search Interface",
                "Search across all legal documents",
            ),
        };
        ResourceDescriptor::new(self.uri(), name, description, self.mime_type())
    }
}

/// Resolves resource URIs to envelopes
///
/// Collaborator failures are logged and rendered as error text; a bad read
/// never reaches the transport as a failure.
#[derive(Clone)]
pub struct ResourceReader {
    collaborators: Collaborators,
    knowledge_base_path: PathBuf,
    tool_names: Vec<String>,
}

impl ResourceReader {
    /// Create a reader over the corpus at `knowledge_base_path`
    ///
    /// `tool_names` are advertised in the search manifest.
    pub fn new(
        collaborators: Collaborators,
        knowledge_base_path: PathBuf,
        tool_names: Vec<String>,
    ) -> Self {
        Self {
            collaborators,
            knowledge_base_path,
            tool_names,
        }
    }

    pub fn knowledge_base_path(&self) -> &Path {
        &self.knowledge_base_path
    }

    /// Read a resource by URI
    pub async fn read(&self, uri: &str) -> ResponseEnvelope {
        let Some(resource) = KnowledgeResource::from_uri(uri) else {
            warn!("Unknown resource requested: {}", uri);
            return ResponseEnvelope::text(format!("Unknown resource: {}", uri));
        };

        debug!("Reading resource {}", uri);

        let result = match resource {
            KnowledgeResource::Corpus => self.read_corpus().await,
            KnowledgeResource::Abgr => self.read_abgr_content().await,
            KnowledgeResource::SearchManifest => {
                Ok(ResponseEnvelope::json(&SearchManifest::new(&self.tool_names)))
            }
        };

        match result {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Error reading resource {}: {}", uri, e);
                ResponseEnvelope::error(e)
            }
        }
    }

    /// Report on the backing corpus without streaming it to the client
    async fn read_corpus(&self) -> Result<ResponseEnvelope, KnowledgeError> {
        let path = &self.knowledge_base_path;
        if !self.collaborators.loader.exists(path).await {
            return Ok(ResponseEnvelope::text(format!(
                "Knowledge base not found at: {}",
                path.display()
            )));
        }

        let content = self.collaborators.loader.read_all(path).await?;
        Ok(ResponseEnvelope::text(format!(
            "Knowledge base loaded: {} characters",
            content.chars().count()
        )))
    }

    async fn read_abgr_content(&self) -> Result<ResponseEnvelope, KnowledgeError> {
        let abgr_content = self.collaborators.abgr_extractor.extract().await?;
        Ok(ResponseEnvelope::json(&serde_json::json!({
            "abgr_content": abgr_content
        })))
    }
}
