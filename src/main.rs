/// Main entry point for the jurisprudence knowledge MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use jurisprudence_mcp::config::DEFAULT_KNOWLEDGE_BASE;
use jurisprudence_mcp::{KnowledgeServer, ServerConfig};

/// Command line arguments for the jurisprudence knowledge MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the jurisprudence knowledge base XML file
    #[arg(long, env = "KNOWLEDGE_BASE_PATH", default_value = DEFAULT_KNOWLEDGE_BASE)]
    knowledge_base: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("jurisprudence_mcp={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting jurisprudence knowledge MCP server");

    if !args.knowledge_base.exists() {
        warn!(
            "Knowledge base not found at {}; the corpus resource will report it as missing",
            args.knowledge_base.display()
        );
    }

    let server = KnowledgeServer::new(ServerConfig {
        knowledge_base_path: args.knowledge_base,
    });

    // Run the MCP server - this will handle JSON-RPC communication over stdin/stdout
    server.run().await?;

    info!("Knowledge MCP server shutdown complete");
    Ok(())
}
