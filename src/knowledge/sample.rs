/// Deterministic sample knowledge base
///
/// Stands in for the search index, citation extractor and ABGR analysis
/// until the real services are wired up. Every answer is fixed data shaped
/// exactly like the collaborator contracts.

use async_trait::async_trait;

use crate::knowledge::{
    AbgrContent, AbgrExtractor, AbgrSummarizer, AbgrSummary, AbgrTopic, Citation,
    CitationExtractor, CitationReport, KnowledgeError, RankedDocument, SearchEngine, SearchQuery,
};

/// Source attribution used by every sample answer
pub const SAMPLE_SOURCE: &str = "AssistMe Knowledge Base";

/// Relevance scores of the sample documents, best first
const SAMPLE_SCORES: [f64; 3] = [0.9, 0.8, 0.7];

/// Fixed-answer implementation of the knowledge collaborators
#[derive(Debug, Clone, Default)]
pub struct SampleKnowledgeBase;

impl SampleKnowledgeBase {
    pub fn new() -> Self {
        Self
    }

    /// Number of documents the sample index can return
    pub fn available_documents(&self) -> usize {
        SAMPLE_SCORES.len()
    }
}

#[async_trait]
impl SearchEngine for SampleKnowledgeBase {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RankedDocument>, KnowledgeError> {
        let documents = SAMPLE_SCORES
            .iter()
            .take(query.max_results)
            .enumerate()
            .map(|(rank, score)| RankedDocument {
                title: format!("Legal Document {}", rank + 1),
                content: format!("Content related to: {}", query.query),
                relevance_score: *score,
                source: SAMPLE_SOURCE.to_string(),
                abgr_related: query.agent_focus,
            })
            .collect();

        Ok(documents)
    }
}

#[async_trait]
impl CitationExtractor for SampleKnowledgeBase {
    async fn extract_citations(&self, _text: &str) -> Result<CitationReport, KnowledgeError> {
        Ok(CitationReport {
            citations: vec![
                Citation {
                    kind: "statute".to_string(),
                    reference: "Example Act, s. 123".to_string(),
                },
                Citation {
                    kind: "regulation".to_string(),
                    reference: "Example Regulation 456/2024".to_string(),
                },
            ],
            confidence: 0.85,
        })
    }
}

#[async_trait]
impl AbgrSummarizer for SampleKnowledgeBase {
    async fn summarize(&self, _topic: &AbgrTopic) -> Result<AbgrSummary, KnowledgeError> {
        Ok(AbgrSummary {
            total_regulations: 15,
            key_areas: vec![
                "Agent Authorization Procedures".to_string(),
                "Compliance Requirements".to_string(),
                "Reporting Standards".to_string(),
                "Operational Guidelines".to_string(),
            ],
            recent_updates: "November 2024".to_string(),
            compliance_level: "Protected B".to_string(),
        })
    }
}

#[async_trait]
impl AbgrExtractor for SampleKnowledgeBase {
    async fn extract(&self) -> Result<AbgrContent, KnowledgeError> {
        Ok(AbgrContent {
            agent_regulations: vec!["Regulation A".to_string(), "Regulation B".to_string()],
            compliance_procedures: vec!["Procedure 1".to_string(), "Procedure 2".to_string()],
            government_guidelines: vec!["Guideline X".to_string(), "Guideline Y".to_string()],
            extracted_from: SAMPLE_SOURCE.to_string(),
            focus: "Government Agent Operations".to_string(),
        })
    }
}
