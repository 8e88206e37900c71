//! Error types for competitor discovery

use thiserror::Error;

use crate::service::llm::LlmError;
use crate::service::oracle::OracleError;

/// Error type for competitor discovery
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiscoveryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Oracle query failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Candidate parsing failed: {0}")]
    Parse(#[from] LlmError),
}
