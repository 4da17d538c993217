/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication,
/// including JSON-RPC parsing, the schema registry and request routing.

pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;

// Re-export main types
pub use registry::{RegistryError, SchemaRegistry};
pub use router::Router;
pub use server::McpServer;
