//! Shared LLM client and structured text generation
//!
//! Provides a common interface for OpenAI API interactions used across services.

use async_trait::async_trait;
use rig::providers::openai;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::CompanyProfile;
use crate::model::extraction::{ExtractedCandidates, ExtractedKeywords};
use crate::service::discovery::prompts::{
    DISCOVERY_FALLBACK_SYSTEM_PROMPT, PARSE_CANDIDATES_SYSTEM_PROMPT, build_fallback_prompt,
    build_parse_prompt,
};
use crate::service::keywords::prompts::{KEYWORD_GENERATION_SYSTEM_PROMPT, build_keyword_prompt};

/// Environment variable for the candidate parsing/fallback model
const ENV_DISCOVERY_MODEL: &str = "DISCOVERY_MODEL";

/// Environment variable for the keyword generation model
const ENV_KEYWORD_MODEL: &str = "KEYWORD_MODEL";

const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Error type for structured text generation
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("LLM extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key)
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying OpenAI client
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}

/// Structured generation collaborator used by discovery and keyword aggregation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Turn a free-text oracle answer into a structured competitor list
    async fn parse_candidates(
        &self,
        niche: &str,
        answer: &str,
        citations: &[String],
    ) -> Result<ExtractedCandidates, LlmError>;

    /// Generate competitors without oracle grounding
    async fn generate_candidates(&self, niche: &str) -> Result<ExtractedCandidates, LlmError>;

    /// Generate brand keywords from a company profile
    async fn generate_keywords(
        &self,
        profile: &CompanyProfile,
    ) -> Result<ExtractedKeywords, LlmError>;
}

/// rig-backed text generator
pub struct LlmTextGenerator {
    llm_client: LlmClient,
    discovery_model: String,
    keyword_model: String,
}

impl LlmTextGenerator {
    /// Uses a shared LLM client passed from startup.
    /// Optionally uses DISCOVERY_MODEL / KEYWORD_MODEL env vars (default gpt-4o-mini).
    pub fn new(llm_client: LlmClient) -> Self {
        let discovery_model =
            std::env::var(ENV_DISCOVERY_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let keyword_model =
            std::env::var(ENV_KEYWORD_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(
            discovery_model = %discovery_model,
            keyword_model = %keyword_model,
            "Text generator initialized"
        );

        Self {
            llm_client,
            discovery_model,
            keyword_model,
        }
    }

    pub fn discovery_model(&self) -> &str {
        &self.discovery_model
    }

    async fn extract<T>(
        &self,
        model: &str,
        preamble: &str,
        prompt: &str,
        operation: &'static str,
    ) -> Result<T, LlmError>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let prompt_length = prompt.len();
        tracing::debug!(
            operation = operation,
            model = %model,
            prompt_length = prompt_length,
            "Initiating OpenAI API call"
        );

        let start_time = std::time::Instant::now();

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<T>(model)
            .preamble(preamble)
            .additional_params(serde_json::json!({
                "temperature": 0.2
            }))
            .build();

        match extractor.extract(prompt).await {
            Ok(result) => {
                tracing::info!(
                    operation = operation,
                    model = %model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    "OpenAI API call completed successfully"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    operation = operation,
                    model = %model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call failed"
                );
                Err(LlmError::ExtractionFailed(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn parse_candidates(
        &self,
        niche: &str,
        answer: &str,
        citations: &[String],
    ) -> Result<ExtractedCandidates, LlmError> {
        let prompt = build_parse_prompt(niche, answer, citations);
        self.extract(
            &self.discovery_model,
            PARSE_CANDIDATES_SYSTEM_PROMPT,
            &prompt,
            "parse_candidates",
        )
        .await
    }

    async fn generate_candidates(&self, niche: &str) -> Result<ExtractedCandidates, LlmError> {
        let prompt = build_fallback_prompt(niche);
        self.extract(
            &self.discovery_model,
            DISCOVERY_FALLBACK_SYSTEM_PROMPT,
            &prompt,
            "generate_candidates",
        )
        .await
    }

    async fn generate_keywords(
        &self,
        profile: &CompanyProfile,
    ) -> Result<ExtractedKeywords, LlmError> {
        let prompt = build_keyword_prompt(profile);
        self.extract(
            &self.keyword_model,
            KEYWORD_GENERATION_SYSTEM_PROMPT,
            &prompt,
            "generate_keywords",
        )
        .await
    }
}
