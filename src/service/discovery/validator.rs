//! Citation validation: a panel of concurrent oracle queries scores each
//! candidate by how often it is named in answers and cited in sources.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::model::{Candidate, CitationEvidence};
use crate::service::domain::extract_domain;
use crate::service::oracle::{KnowledgeOracle, OracleAnswer};

use super::prompts::{VALIDATION_SYSTEM_PROMPT, build_validation_queries};

const MENTION_WEIGHT: f64 = 0.7;
const CITATION_WEIGHT: f64 = 0.3;
const MAX_SCORE: f64 = 100.0;

/// Per-candidate accumulator for one validation round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateTally {
    domain: String,
    pub mention_count: u32,
    pub citation_count: u32,
}

impl CandidateTally {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Default::default()
        }
    }

    /// Count one successful query result against this candidate
    fn record(&mut self, name_key: &str, answer_lower: &str, cited_domains: &[String]) {
        if !name_key.is_empty() && answer_lower.contains(name_key) {
            self.mention_count += 1;
        }
        if !self.domain.is_empty() && cited_domains.iter().any(|d| d.contains(&self.domain)) {
            self.citation_count += 1;
        }
    }

    fn evidence(&self, total: u32) -> CitationEvidence {
        let mention_rate = percentage(self.mention_count, total);
        let citation_rate = percentage(self.citation_count, total);
        CitationEvidence {
            mention_count: self.mention_count,
            citation_count: self.citation_count,
            mention_rate: mention_rate as u8,
            citation_rate: citation_rate as u8,
            evidence_count: self.mention_count + self.citation_count,
            validation_queries: total,
        }
    }

    fn score(&self, total: u32) -> u8 {
        weighted_score(
            percentage(self.mention_count, total),
            percentage(self.citation_count, total),
        )
    }
}

fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}

/// `floor(0.7 * mention_rate + 0.3 * citation_rate)`, clamped to 0..=100
pub fn weighted_score(mention_rate: f64, citation_rate: f64) -> u8 {
    let raw = mention_rate * MENTION_WEIGHT + citation_rate * CITATION_WEIGHT;
    raw.floor().clamp(0.0, MAX_SCORE) as u8
}

/// Result of a validation round
#[derive(Debug)]
pub struct ValidationRound {
    pub candidates: Vec<Candidate>,
    /// Queries dispatched
    pub attempted: u32,
    /// Queries that produced an answer
    pub successful: u32,
}

/// Validates candidates against the oracle
pub struct CitationValidator {
    oracle: Arc<dyn KnowledgeOracle>,
}

impl CitationValidator {
    pub fn new(oracle: Arc<dyn KnowledgeOracle>) -> Self {
        Self { oracle }
    }

    /// Run the validation panel for `niche` and score every candidate.
    ///
    /// When no query succeeds the candidates are returned unchanged.
    pub async fn validate(&self, niche: &str, candidates: Vec<Candidate>) -> ValidationRound {
        let queries = build_validation_queries(niche);
        let attempted = queries.len() as u32;

        tracing::info!(
            niche = %niche,
            candidates = candidates.len(),
            queries = attempted,
            "Running citation validation"
        );

        let futures: Vec<_> = queries
            .iter()
            .map(|q| self.oracle.query(VALIDATION_SYSTEM_PROMPT, q))
            .collect();

        let results = join_all(futures).await;

        let answers: Vec<OracleAnswer> = results
            .into_iter()
            .enumerate()
            .filter_map(|(i, result)| match result {
                Ok(answer) => Some(answer),
                Err(e) => {
                    tracing::warn!(query = i + 1, error = %e, "Validation query failed");
                    None
                }
            })
            .collect();

        let successful = answers.len() as u32;
        if successful == 0 {
            tracing::warn!(niche = %niche, "All validation queries failed, returning candidates unscored");
            return ValidationRound {
                candidates,
                attempted,
                successful,
            };
        }

        let tallies = tally_answers(&candidates, &answers);

        let candidates = candidates
            .into_iter()
            .map(|mut candidate| {
                if let Some(tally) = tallies.get(&candidate.name_key()) {
                    candidate.score = tally.score(successful);
                    candidate.validation = Some(tally.evidence(successful));
                    tracing::debug!(
                        name = %candidate.name,
                        mentions = tally.mention_count,
                        citations = tally.citation_count,
                        total = successful,
                        score = candidate.score,
                        "Candidate validated"
                    );
                }
                candidate
            })
            .collect();

        ValidationRound {
            candidates,
            attempted,
            successful,
        }
    }
}

/// Build one tally per unique lowercase name and fold every answer into it.
/// Candidates sharing a name share a tally; the first one's domain is used.
pub fn tally_answers(
    candidates: &[Candidate],
    answers: &[OracleAnswer],
) -> HashMap<String, CandidateTally> {
    let mut tallies: HashMap<String, CandidateTally> = HashMap::new();
    for candidate in candidates {
        tallies
            .entry(candidate.name_key())
            .or_insert_with(|| CandidateTally::new(&candidate.domain));
    }

    for answer in answers {
        let answer_lower = answer.answer.to_lowercase();
        let cited_domains: Vec<String> = answer
            .citations
            .iter()
            .map(|url| extract_domain(url))
            .filter(|d| !d.is_empty())
            .collect();

        for (name_key, tally) in tallies.iter_mut() {
            tally.record(name_key, &answer_lower, &cited_domains);
        }
    }

    tallies
}
