/// Protocol router mapping JSON-RPC methods to handlers
///
/// The router is pure dispatch: list/read resources go to the registry and
/// resource reader, list/call tools go to the registry and tool dispatcher.
/// It holds no mutable state, so one instance can serve any number of
/// requests, serialized or pipelined.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::domain::{ResponseEnvelope, ToolInvocation};
use crate::knowledge::Collaborators;
use crate::mcp::protocol::*;
use crate::mcp::registry::SchemaRegistry;
use crate::resources::{ResourceReader, FALLBACK_MIME_TYPE};
use crate::tools::ToolDispatcher;

/// Name reported in `initialize`
pub const SERVER_NAME: &str = "eva-foundation-knowledge";

/// Routes protocol requests to the registry, resource reader and tool dispatcher
#[derive(Clone)]
pub struct Router {
    registry: Arc<SchemaRegistry>,
    resources: ResourceReader,
    tools: ToolDispatcher,
}

impl Router {
    pub fn new(registry: Arc<SchemaRegistry>, resources: ResourceReader, tools: ToolDispatcher) -> Self {
        Self {
            registry,
            resources,
            tools,
        }
    }

    /// Wire the built-in registry to the given collaborators
    pub fn with_collaborators(knowledge_base_path: PathBuf, collaborators: Collaborators) -> Self {
        let registry = Arc::new(SchemaRegistry::new());
        let resources = ResourceReader::new(
            collaborators.clone(),
            knowledge_base_path,
            registry.tool_names(),
        );
        let tools = ToolDispatcher::new(collaborators);
        Self::new(registry, resources, tools)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// `resources/list`
    pub fn list_resources(&self) -> ListResourcesResult<'_> {
        ListResourcesResult {
            resources: self.registry.list_resources(),
        }
    }

    /// `resources/read`
    pub async fn read_resource(&self, uri: &str) -> ReadResourceResult {
        let envelope = self.resources.read(uri).await;
        let mime_type = self
            .registry
            .resource(uri)
            .filter(|_| !envelope.is_error)
            .map(|descriptor| descriptor.mime_type.clone())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        ReadResourceResult {
            contents: envelope
                .content
                .into_iter()
                .map(|block| ResourceContents {
                    uri: uri.to_string(),
                    mime_type: mime_type.clone(),
                    text: block.text().to_string(),
                })
                .collect(),
        }
    }

    /// `tools/list`
    pub fn list_tools(&self) -> ListToolsResult<'_> {
        ListToolsResult {
            tools: self.registry.list_tools(),
        }
    }

    /// `tools/call`
    pub async fn call_tool(&self, invocation: &ToolInvocation) -> ResponseEnvelope {
        self.tools.call(invocation).await
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                error!("Invalid JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a parsed JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Received notification: {}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "resources/list" => respond(id, &self.list_resources()),
            "resources/read" => match parse_params::<ResourceUriParams>(request.params) {
                Ok(params) => respond(id, &self.read_resource(&params.uri).await),
                Err(message) => invalid_params(id, message),
            },
            "resources/subscribe" | "resources/unsubscribe" => {
                match parse_params::<ResourceUriParams>(request.params) {
                    Ok(params) => {
                        debug!("{} acknowledged for {}", request.method, params.uri);
                        JsonRpcResponse::success(id, json!({}))
                    }
                    Err(message) => invalid_params(id, message),
                }
            }
            "tools/list" => respond(id, &self.list_tools()),
            "tools/call" => match parse_params::<ToolInvocation>(request.params) {
                Ok(invocation) => respond(id, &self.call_tool(&invocation).await),
                Err(message) => invalid_params(id, message),
            },
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        match &params.client_info {
            Some(client) => info!(
                "MCP client connected: {} {} (protocol {})",
                client.name, client.version, params.protocol_version
            ),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                resources: Some(ResourcesCapability {
                    subscribe: true,
                    list_changed: true,
                }),
                tools: Some(ToolsCapability { list_changed: true }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }
}

/// Serialize a result into a success response
fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize result: {}", e),
                None,
            )
        }
    }
}

fn parse_params<P: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<P, String> {
    match params {
        Some(params) => {
            serde_json::from_value(params).map_err(|e| format!("Invalid parameters: {}", e))
        }
        None => Err("Missing parameters".to_string()),
    }
}

fn invalid_params(id: Value, message: String) -> JsonRpcResponse {
    JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message, None)
}
