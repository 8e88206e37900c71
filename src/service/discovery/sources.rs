//! Candidate discovery strategies and the first-non-empty combinator

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::extraction::ExtractedCandidates;
use crate::model::{Candidate, Provenance};
use crate::service::IntelCache;
use crate::service::cache_keys::generate_discovery_cache_key;
use crate::service::llm::TextGenerator;
use crate::service::oracle::KnowledgeOracle;

use super::error::DiscoveryError;
use super::prompts::{DISCOVERY_ORACLE_SYSTEM_PROMPT, build_discovery_query};

/// One way of producing an initial candidate list
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Stable tag reported as `discovery_source`
    fn name(&self) -> &'static str;

    async fn discover(&self, niche: &str) -> Result<Vec<Candidate>, DiscoveryError>;
}

/// Tagged result of running one strategy
#[derive(Debug)]
pub enum SourceOutcome {
    Found(Vec<Candidate>),
    Empty,
    Failed(DiscoveryError),
}

impl From<Result<Vec<Candidate>, DiscoveryError>> for SourceOutcome {
    fn from(result: Result<Vec<Candidate>, DiscoveryError>) -> Self {
        match result {
            Ok(candidates) if candidates.is_empty() => SourceOutcome::Empty,
            Ok(candidates) => SourceOutcome::Found(candidates),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}

/// Candidates plus the tag of the strategy that produced them
#[derive(Debug, Default)]
pub struct DiscoveredCandidates {
    pub candidates: Vec<Candidate>,
    pub source: Option<&'static str>,
}

/// Run strategies in order; the first non-empty list wins.
///
/// Failures are logged and never propagated. When every strategy comes back
/// empty the result has no candidates and no source.
pub async fn first_non_empty(
    sources: &[Arc<dyn CandidateSource>],
    niche: &str,
) -> DiscoveredCandidates {
    for source in sources {
        match SourceOutcome::from(source.discover(niche).await) {
            SourceOutcome::Found(candidates) => {
                tracing::info!(
                    source = source.name(),
                    candidates = candidates.len(),
                    "Discovery strategy succeeded"
                );
                return DiscoveredCandidates {
                    candidates,
                    source: Some(source.name()),
                };
            }
            SourceOutcome::Empty => {
                tracing::warn!(source = source.name(), "Discovery strategy returned no candidates");
            }
            SourceOutcome::Failed(e) => {
                tracing::warn!(source = source.name(), error = %e, "Discovery strategy failed");
            }
        }
    }

    DiscoveredCandidates::default()
}

/// Convert structured generator output into candidates with a zero score.
/// Entries whose name is blank after trimming are dropped.
pub fn candidates_from_extraction(
    extracted: ExtractedCandidates,
    provenance: Provenance,
) -> Vec<Candidate> {
    extracted
        .competitors
        .into_iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| {
            let mut candidate =
                Candidate::new(&c.name, c.url.as_deref().unwrap_or_default(), provenance);
            candidate.strengths = c.strengths.filter(|s| !s.trim().is_empty());
            candidate.products = c.products.filter(|s| !s.trim().is_empty());
            candidate
        })
        .collect()
}

/// Oracle-grounded discovery: one broad query, then structured parsing
pub struct OracleCandidateSource {
    oracle: Arc<dyn KnowledgeOracle>,
    generator: Arc<dyn TextGenerator>,
    cache: Option<IntelCache>,
    model_id: String,
}

impl OracleCandidateSource {
    pub fn new(
        oracle: Arc<dyn KnowledgeOracle>,
        generator: Arc<dyn TextGenerator>,
        cache: Option<IntelCache>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            oracle,
            generator,
            cache,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl CandidateSource for OracleCandidateSource {
    fn name(&self) -> &'static str {
        "oracle"
    }

    async fn discover(&self, niche: &str) -> Result<Vec<Candidate>, DiscoveryError> {
        let cache_key = generate_discovery_cache_key(niche, &self.model_id);

        if let Some(cache) = &self.cache {
            match cache.get_discovery::<Vec<Candidate>>(&cache_key).await {
                Ok(cached) if !cached.is_empty() => {
                    tracing::debug!(niche = %niche, candidates = cached.len(), "Discovery cache hit");
                    return Ok(cached);
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(niche = %niche, reason = %e, "Discovery cache miss"),
            }
        }

        let answer = self
            .oracle
            .query(DISCOVERY_ORACLE_SYSTEM_PROMPT, &build_discovery_query(niche))
            .await?;

        tracing::debug!(
            niche = %niche,
            answer_length = answer.answer.len(),
            citations = answer.citations.len(),
            "Discovery answer received"
        );

        let extracted = self
            .generator
            .parse_candidates(niche, &answer.answer, &answer.citations)
            .await?;

        let candidates = candidates_from_extraction(extracted, Provenance::OracleDiscovered);

        if let Some(cache) = &self.cache
            && !candidates.is_empty()
            && let Err(e) = cache.set_discovery(&cache_key, &candidates).await
        {
            tracing::warn!(niche = %niche, error = %e, "Failed to cache discovery candidates");
        }

        Ok(candidates)
    }
}

/// Ungrounded fallback: the text generator names competitors on its own
pub struct AiCandidateSource {
    generator: Arc<dyn TextGenerator>,
}

impl AiCandidateSource {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl CandidateSource for AiCandidateSource {
    fn name(&self) -> &'static str {
        "ai_fallback"
    }

    async fn discover(&self, niche: &str) -> Result<Vec<Candidate>, DiscoveryError> {
        let extracted = self.generator.generate_candidates(niche).await?;
        Ok(candidates_from_extraction(extracted, Provenance::AiFallbackGenerated))
    }
}
