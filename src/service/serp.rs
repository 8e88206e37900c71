//! SerpApi client service
//!
//! Provides Google result pages (related searches, related questions and
//! organic results) for keyword harvesting.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::model::SerpConfig;
use crate::service::IntelCache;
use crate::service::cache_keys::generate_serp_cache_key;

const ENV_SERPAPI_KEY: &str = "SERPAPI_KEY";
const ENV_SERP_BASE_URL: &str = "SERP_BASE_URL";

const SERP_TIMEOUT_SECS: u64 = 30;
const RESULTS_PER_QUERY: u32 = 15;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SerpError {
    #[error("SerpApi not configured (missing {ENV_SERPAPI_KEY})")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// The subset of a SerpApi Google response used for keyword harvesting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpResponse {
    #[serde(default)]
    pub related_searches: Vec<RelatedSearch>,
    #[serde(default)]
    pub related_questions: Vec<RelatedQuestion>,
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedSearch {
    #[serde(default)]
    pub query: String,
}

/// "People also ask" entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl SerpResponse {
    /// 1-based organic rank of the first result whose link contains `domain`
    pub fn rank_of(&self, domain: &str) -> Option<u32> {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return None;
        }

        self.organic_results
            .iter()
            .position(|r| r.link.to_lowercase().contains(&domain))
            .map(|idx| idx as u32 + 1)
    }
}

/// Web search results provider
#[async_trait]
pub trait SerpSearch: Send + Sync {
    async fn search(&self, query: &str, location: &str) -> Result<SerpResponse, SerpError>;
}

/// Client for the SerpApi Google engine
pub struct SerpApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    cache: Option<IntelCache>,
}

impl SerpApiClient {
    /// Create a new SerpApi client
    ///
    /// The base URL is resolved in this order:
    /// 1. `SERP_BASE_URL` environment variable if set
    /// 2. `serp.base_url` from the config file
    pub fn new(config: &SerpConfig, cache: Option<IntelCache>) -> Self {
        let api_key = env::var(ENV_SERPAPI_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("SerpApi key not found ({ENV_SERPAPI_KEY}), SERP keywords disabled");
        }

        let base_url = env::var(ENV_SERP_BASE_URL).unwrap_or_else(|_| config.base_url.clone());

        let client = Client::builder()
            .timeout(Duration::from_secs(SERP_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build SERP HTTP client, using defaults");
                Client::new()
            });

        Self {
            client,
            api_key,
            base_url,
            cache,
        }
    }
}

#[async_trait]
impl SerpSearch for SerpApiClient {
    async fn search(&self, query: &str, location: &str) -> Result<SerpResponse, SerpError> {
        let api_key = self.api_key.as_ref().ok_or(SerpError::NotConfigured)?;
        let cache_key = generate_serp_cache_key(query, location);

        if let Some(cache) = &self.cache {
            match cache.get_serp::<SerpResponse>(&cache_key).await {
                Ok(cached) => {
                    tracing::debug!(query = %query, "SERP cache hit");
                    return Ok(cached);
                }
                Err(e) => tracing::debug!(query = %query, reason = %e, "SERP cache miss"),
            }
        }

        let num = RESULTS_PER_QUERY.to_string();
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", api_key.as_str()),
                ("engine", "google"),
                ("q", query),
                ("location", location),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(query = %query, status = status, "SerpApi returned error status");
            return Err(SerpError::Status { status, body });
        }

        let parsed: SerpResponse = response
            .json()
            .await
            .map_err(|e| SerpError::ParseError(e.to_string()))?;

        tracing::debug!(
            query = %query,
            elapsed_ms = start_time.elapsed().as_millis(),
            related_searches = parsed.related_searches.len(),
            related_questions = parsed.related_questions.len(),
            "SERP query completed"
        );

        if let Some(cache) = &self.cache
            && let Err(e) = cache.set_serp(&cache_key, &parsed).await
        {
            tracing::warn!(query = %query, error = %e, "Failed to cache SERP response");
        }

        Ok(parsed)
    }
}
