/// Tool invocations and argument validation
///
/// Arguments arrive as a loosely-typed JSON map. They are validated by
/// deserializing into the tool's typed parameter struct, which applies the
/// documented defaults and rejects missing required fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// A single `tools/call` request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to call
    #[serde(rename = "name")]
    pub tool_name: String,
    /// Arguments to pass to the tool; absent or `null` means none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Build an invocation from a JSON object literal (non-objects yield no arguments)
    pub fn from_value(tool_name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(tool_name, arguments)
    }

    /// Validate the arguments against a typed parameter struct
    pub fn parse_arguments<P: DeserializeOwned>(&self) -> Result<P, DomainError> {
        serde_json::from_value(Value::Object(self.arguments.clone())).map_err(|e| {
            DomainError::InvalidArguments {
                tool: self.tool_name.clone(),
                message: e.to_string(),
            }
        })
    }
}
