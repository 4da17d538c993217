/// Domain module containing the protocol-facing data types
///
/// This module defines descriptors, envelopes, tool invocations and the
/// ingestion payloads. These types represent the contract between the
/// server, its clients and the remote ingestion job.

mod descriptor;
mod envelope;
mod invocation;
mod ingestion;

// Re-export public types for easy access
pub use descriptor::*;
pub use envelope::*;
pub use invocation::*;
pub use ingestion::*;

use thiserror::Error;

/// Errors that can occur while validating domain input
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}
