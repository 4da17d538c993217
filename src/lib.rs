/// Public library interface for the jurisprudence knowledge MCP server
///
/// This module exports the server, the protocol router and its
/// collaborators, and the ingestion client used to load new source
/// documents into the knowledge base.

use thiserror::Error;

pub mod config;
pub mod domain;
pub mod ingestion;
pub mod knowledge;
pub mod mcp;
pub mod resources;
pub mod tools;

// Re-export public modules and types
pub use config::{IngestionConfig, ServerConfig};
pub use domain::*;
pub use ingestion::{IngestionClient, IngestionError, UploadReceipt};
pub use knowledge::Collaborators;
pub use mcp::{McpServer, Router, SchemaRegistry};
pub use resources::ResourceReader;
pub use tools::ToolDispatcher;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Knowledge server that implements the MCP protocol
///
/// Holds the router (registry plus handler bindings) built once at startup.
/// Nothing in it is mutated after construction.
pub struct KnowledgeServer {
    config: ServerConfig,
    router: Router,
}

impl KnowledgeServer {
    /// Create a server backed by the sample collaborators
    pub fn new(config: ServerConfig) -> Self {
        Self::with_collaborators(config, Collaborators::sample())
    }

    /// Create a server backed by the given collaborators
    pub fn with_collaborators(config: ServerConfig, collaborators: Collaborators) -> Self {
        tracing::info!(
            "Initializing knowledge server with corpus: {}",
            config.knowledge_base_path.display()
        );

        let router = Router::with_collaborators(config.knowledge_base_path.clone(), collaborators);

        Self { config, router }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "Serving {} resources and {} tools",
            self.router.registry().list_resources().len(),
            self.router.registry().list_tools().len()
        );
        tracing::info!("Ready to serve jurisprudence and ABGR content");

        let mcp_server = McpServer::new(self.router);
        mcp_server.run().await
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the router (useful for testing)
    pub fn router(&self) -> &Router {
        &self.router
    }
}
