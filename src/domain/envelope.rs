/// Response envelope returned for every resource read and tool call
///
/// An envelope is never partially filled: it carries either the full
/// successful content or a single block describing the failure.

use serde::Serialize;

/// A typed block of content inside an envelope
///
/// Only text is produced today; the tag keeps the wire format open for
/// other block kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text (JSON documents are rendered as pretty-printed text)
    Text { text: String },
}

impl ContentBlock {
    /// Borrow the text of this block
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Normalized success/error wrapper for a single request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Ordered content blocks, never empty
    pub content: Vec<ContentBlock>,
    /// Whether the single block describes a failure
    pub is_error: bool,
}

impl ResponseEnvelope {
    /// Create a successful envelope with one text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Create a successful envelope holding a value rendered as pretty JSON
    ///
    /// Serialization failures are folded into an error envelope so that
    /// callers never have to handle them.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("failed to render response: {}", e)),
        }
    }

    /// Create an error envelope with a single descriptive block
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: format!("Error: {}", message),
            }],
            is_error: true,
        }
    }

    /// Concatenated text of all blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
