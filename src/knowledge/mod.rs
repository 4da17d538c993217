/// Knowledge base collaborators
///
/// The server never talks to the corpus directly. Reading, search, citation
/// extraction and ABGR summaries all go through the traits in this module,
/// so the sample implementations can be swapped for real services without
/// touching the resource reader or tool dispatcher.

pub mod loader;
pub mod sample;

// Re-export the shipped implementations
pub use loader::FsKnowledgeBaseLoader;
pub use sample::SampleKnowledgeBase;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors reported by a knowledge collaborator
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Knowledge source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed knowledge data: {0}")]
    Malformed(String),
}

/// Query handed to a search engine
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    /// Restrict to agent-related (ABGR) content
    pub agent_focus: bool,
    /// Upper bound on the number of documents returned
    pub max_results: usize,
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub title: String,
    /// Content snippet
    pub content: String,
    /// Relevance in [0, 1], descending by rank
    pub relevance_score: f64,
    /// Source attribution
    pub source: String,
    pub abgr_related: bool,
}

/// A legal reference found in free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// Reference kind, e.g. "statute" or "regulation"
    #[serde(rename = "type")]
    pub kind: String,
    pub reference: String,
}

/// Output of a citation extractor
#[derive(Debug, Clone, PartialEq)]
pub struct CitationReport {
    pub citations: Vec<Citation>,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Topic selector for ABGR summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbgrTopic {
    /// General summary across every topic
    All,
    Named(String),
}

impl AbgrTopic {
    /// Sentinel topic string for the general summary
    pub const ALL: &'static str = "all";

    pub fn parse(topic: &str) -> Self {
        if topic.trim().eq_ignore_ascii_case(Self::ALL) {
            AbgrTopic::All
        } else {
            AbgrTopic::Named(topic.to_string())
        }
    }
}

impl fmt::Display for AbgrTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbgrTopic::All => f.write_str(Self::ALL),
            AbgrTopic::Named(name) => f.write_str(name),
        }
    }
}

/// Aggregate view of agent-related regulations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbgrSummary {
    pub total_regulations: u32,
    pub key_areas: Vec<String>,
    /// Recency marker, e.g. "November 2024"
    pub recent_updates: String,
    pub compliance_level: String,
}

/// Agent-related regulatory content extracted from the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbgrContent {
    pub agent_regulations: Vec<String>,
    pub compliance_procedures: Vec<String>,
    pub government_guidelines: Vec<String>,
    /// Source attribution
    pub extracted_from: String,
    pub focus: String,
}

/// Access to the backing corpus file
#[async_trait]
pub trait KnowledgeBaseLoader: Send + Sync {
    /// Whether the corpus exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Read the full corpus as text
    async fn read_all(&self, path: &Path) -> Result<String, KnowledgeError>;
}

#[async_trait]
pub trait AbgrExtractor: Send + Sync {
    async fn extract(&self) -> Result<AbgrContent, KnowledgeError>;
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Ranked documents for `query`, at most `query.max_results` of them
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RankedDocument>, KnowledgeError>;
}

#[async_trait]
pub trait CitationExtractor: Send + Sync {
    async fn extract_citations(&self, text: &str) -> Result<CitationReport, KnowledgeError>;
}

#[async_trait]
pub trait AbgrSummarizer: Send + Sync {
    async fn summarize(&self, topic: &AbgrTopic) -> Result<AbgrSummary, KnowledgeError>;
}

/// The set of collaborators the resource reader and tool dispatcher call into
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct Collaborators {
    pub loader: Arc<dyn KnowledgeBaseLoader>,
    pub abgr_extractor: Arc<dyn AbgrExtractor>,
    pub search: Arc<dyn SearchEngine>,
    pub citations: Arc<dyn CitationExtractor>,
    pub summarizer: Arc<dyn AbgrSummarizer>,
}

impl Collaborators {
    /// Filesystem corpus loader plus the deterministic sample implementations
    pub fn sample() -> Self {
        let sample = Arc::new(SampleKnowledgeBase::new());
        Self {
            loader: Arc::new(FsKnowledgeBaseLoader),
            abgr_extractor: sample.clone(),
            search: sample.clone(),
            citations: sample.clone(),
            summarizer: sample,
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn KnowledgeBaseLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_abgr_extractor(mut self, extractor: Arc<dyn AbgrExtractor>) -> Self {
        self.abgr_extractor = extractor;
        self
    }

    pub fn with_search(mut self, search: Arc<dyn SearchEngine>) -> Self {
        self.search = search;
        self
    }

    pub fn with_citations(mut self, citations: Arc<dyn CitationExtractor>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn AbgrSummarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }
}
