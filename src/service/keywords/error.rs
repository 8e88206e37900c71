//! Error types for keyword producers

use thiserror::Error;

use crate::service::llm::LlmError;
use crate::service::serp::SerpError;

/// Error type for a single keyword producer
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeywordSourceError {
    #[error("SERP unavailable: {0}")]
    Serp(#[from] SerpError),

    #[error("Keyword generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
