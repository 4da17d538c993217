/// Tool for extracting legal citations from free text
///
/// This module implements the extract_citations MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::knowledge::{Citation, CitationExtractor};
use crate::tools::ToolError;

/// Number of characters echoed back in `text_analyzed`
pub const PREVIEW_CHARS: usize = 100;

/// Parameters for extracting citations
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractCitationsParams {
    /// Text to extract citations from
    pub text: String,
}

/// Response from extracting citations
#[derive(Debug, Serialize)]
pub struct ExtractCitationsResponse {
    /// Preview of the analyzed text
    pub text_analyzed: String,
    pub citations_found: Vec<Citation>,
    pub extraction_confidence: f64,
}

/// Extract citations using the provided extractor
///
/// The extractor always receives the full text; only the echoed preview is
/// truncated.
pub async fn extract_citations(
    extractor: &dyn CitationExtractor,
    params: ExtractCitationsParams,
) -> Result<ExtractCitationsResponse, ToolError> {
    let report = extractor.extract_citations(&params.text).await?;

    Ok(ExtractCitationsResponse {
        text_analyzed: preview(&params.text, PREVIEW_CHARS),
        citations_found: report.citations,
        extraction_confidence: report.confidence,
    })
}

/// First `limit` characters of `text`, with `...` appended iff anything was cut
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
