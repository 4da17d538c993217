/// Descriptors for the resources and tools the server exposes
///
/// These are immutable once built and are what `resources/list` and
/// `tools/list` return to the client.

use serde::Serialize;
use serde_json::Value;

/// A URI-addressed unit of content that clients can read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Namespaced URI, e.g. `knowledge://jurisprudence/all`
    pub uri: String,
    /// Human-readable display name
    pub name: String,
    pub description: String,
    /// MIME type of the content returned when read
    pub mime_type: String,
}

impl ResourceDescriptor {
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: description.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// A named, schema-validated operation clients can invoke
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name (e.g., "search_jurisprudence")
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's arguments: names, types, defaults and required set
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Names of the arguments the schema marks as required
    pub fn required_arguments(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Documented default for an argument, if the schema declares one
    pub fn argument_default(&self, argument: &str) -> Option<&Value> {
        self.input_schema
            .get("properties")
            .and_then(|props| props.get(argument))
            .and_then(|prop| prop.get("default"))
    }
}
