/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the transport side of the server:
/// 1. Reads newline-delimited JSON-RPC requests
/// 2. Hands each one to the router
/// 3. Writes the JSON-RPC response back, one per line

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::{error_codes, JsonRpcResponse};
use crate::mcp::router::Router;
use crate::ServerError;

/// MCP server that serves a router over a byte stream
pub struct McpServer {
    router: Router,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader` until it reaches end of input
    ///
    /// A line that is not valid UTF-8 is answered with a parse error and the
    /// session continues. Only end of input or a transport I/O error stops it.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();

            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    let response = match std::str::from_utf8(&buf) {
                        Ok(line) => self.router.handle_line(line).await,
                        Err(e) => {
                            warn!("Received a line that is not valid UTF-8: {}", e);
                            Some(JsonRpcResponse::error(
                                Value::Null,
                                error_codes::PARSE_ERROR,
                                format!("Invalid UTF-8: {}", e),
                                None,
                            ))
                        }
                    };

                    if let Some(response) = response {
                        let response_str = serde_json::to_string(&response)?;

                        // Write response + newline
                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}
