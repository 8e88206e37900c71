//! Knowledge oracle client (Perplexity Sonar)
//!
//! Sends natural-language queries to a retrieval-augmented answer service and
//! normalizes the response into answer text plus cited URLs.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::OracleConfig;

const ENV_PERPLEXITY_API_KEY: &str = "PERPLEXITY_API_KEY";
const ENV_ORACLE_BASE_URL: &str = "ORACLE_BASE_URL";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error("Oracle not configured (missing {ENV_PERPLEXITY_API_KEY})")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Oracle returned an empty answer")]
    EmptyAnswer,
}

/// Normalized oracle response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OracleAnswer {
    pub answer: String,
    /// Cited source URLs, in the order the oracle returned them
    pub citations: Vec<String>,
}

/// Retrieval-augmented answer service
#[async_trait]
pub trait KnowledgeOracle: Send + Sync {
    /// Ask a question under the given system instruction.
    ///
    /// An empty answer is reported as `OracleError::EmptyAnswer`.
    async fn query(&self, system: &str, query: &str) -> Result<OracleAnswer, OracleError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    citations: Vec<RawCitation>,
    #[serde(default)]
    search_results: Vec<RawCitation>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Citations arrive either as bare URLs or as `{url, title}` objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCitation {
    Url(String),
    Structured {
        #[serde(default)]
        url: Option<String>,
    },
}

impl RawCitation {
    fn into_url(self) -> Option<String> {
        let url = match self {
            RawCitation::Url(url) => url,
            RawCitation::Structured { url } => url?,
        };
        let url = url.trim().to_string();
        (!url.is_empty()).then_some(url)
    }
}

impl ChatCompletionResponse {
    fn into_answer(self) -> Result<OracleAnswer, OracleError> {
        let answer = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        if answer.trim().is_empty() {
            return Err(OracleError::EmptyAnswer);
        }

        let raw = if self.citations.is_empty() {
            self.search_results
        } else {
            self.citations
        };

        Ok(OracleAnswer {
            answer,
            citations: raw.into_iter().filter_map(RawCitation::into_url).collect(),
        })
    }
}

/// Client for the Perplexity chat-completions API
pub struct PerplexityClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl PerplexityClient {
    /// Create a new oracle client
    ///
    /// The base URL is resolved in this order:
    /// 1. `ORACLE_BASE_URL` environment variable if set
    /// 2. `oracle.base_url` from the config file (defaults to the Perplexity API)
    pub fn new(config: &OracleConfig) -> Self {
        let api_key = env::var(ENV_PERPLEXITY_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!(
                "Perplexity API key not found ({ENV_PERPLEXITY_API_KEY}), oracle queries will fail"
            );
        }

        let base_url = env::var(ENV_ORACLE_BASE_URL).unwrap_or_else(|_| config.base_url.clone());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build oracle HTTP client, using defaults");
                Client::new()
            });

        tracing::info!(model = %config.model, base_url = %base_url, "Oracle client initialized");

        Self {
            client,
            api_key,
            base_url,
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl KnowledgeOracle for PerplexityClient {
    async fn query(&self, system: &str, query: &str) -> Result<OracleAnswer, OracleError> {
        let api_key = self.api_key.as_ref().ok_or(OracleError::NotConfigured)?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": query}
            ],
            "return_citations": true
        });

        tracing::debug!(model = %self.model, query_length = query.len(), "Sending oracle query");
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status,
                elapsed_ms = start_time.elapsed().as_millis(),
                "Oracle query returned error status"
            );
            return Err(OracleError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        let answer = parsed.into_answer()?;

        tracing::debug!(
            elapsed_ms = start_time.elapsed().as_millis(),
            answer_length = answer.answer.len(),
            citations = answer.citations.len(),
            "Oracle query completed"
        );

        Ok(answer)
    }
}
