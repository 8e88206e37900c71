//! Competitor discovery with citation-validated ranking
//!
//! Pipeline: discovery strategies (oracle, then AI fallback) produce
//! candidates, the citation validator scores them, and ranking applies the
//! score cutoff with relaxation. The self candidate rides along through
//! validation and is always placed first.

pub mod error;
pub mod prompts;
pub mod ranking;
pub mod sources;
pub mod validator;

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{Candidate, DiscoveryReport, SelfBrand};
use crate::service::IntelCache;
use crate::service::llm::TextGenerator;
use crate::service::oracle::KnowledgeOracle;

pub use error::DiscoveryError;
pub use ranking::rank_candidates;
pub use sources::{AiCandidateSource, CandidateSource, OracleCandidateSource};
pub use validator::CitationValidator;

const NO_SOURCE: &str = "none";

/// Service for discovering and ranking competitors
pub struct CompetitorDiscoveryService {
    sources: Vec<Arc<dyn CandidateSource>>,
    validator: CitationValidator,
}

impl CompetitorDiscoveryService {
    /// Oracle-grounded discovery first, AI-only generation as fallback
    pub fn new(
        oracle: Arc<dyn KnowledgeOracle>,
        generator: Arc<dyn TextGenerator>,
        cache: Option<IntelCache>,
        model_id: &str,
    ) -> Self {
        let sources: Vec<Arc<dyn CandidateSource>> = vec![
            Arc::new(OracleCandidateSource::new(
                Arc::clone(&oracle),
                Arc::clone(&generator),
                cache,
                model_id,
            )),
            Arc::new(AiCandidateSource::new(generator)),
        ];

        Self::with_sources(sources, CitationValidator::new(oracle))
    }

    pub fn with_sources(
        sources: Vec<Arc<dyn CandidateSource>>,
        validator: CitationValidator,
    ) -> Self {
        Self { sources, validator }
    }

    /// Discover, validate and rank competitors for a niche or brand.
    ///
    /// Only a blank niche is an error. Collaborator failures degrade to an
    /// empty candidate list, which may still contain the self candidate.
    pub async fn discover_and_validate(
        &self,
        niche: &str,
        self_brand: Option<&SelfBrand>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let niche = niche.trim();
        if niche.is_empty() {
            return Err(DiscoveryError::InvalidInput("niche must not be empty".to_string()));
        }

        tracing::info!(niche = %niche, has_self = self_brand.is_some(), "Starting competitor discovery");

        let discovered = sources::first_non_empty(&self.sources, niche).await;
        let discovery_source = discovered.source.unwrap_or(NO_SOURCE).to_string();

        let self_candidate = self_brand.map(Candidate::self_brand);
        let candidates = merge_candidates(self_candidate, discovered.candidates);

        if candidates.is_empty() {
            tracing::warn!(niche = %niche, "No candidates found");
            return Ok(DiscoveryReport {
                niche: niche.to_string(),
                candidates,
                discovery_source,
                validation_queries: 0,
            });
        }

        let round = self.validator.validate(niche, candidates).await;
        let ranked = rank_candidates(round.candidates);

        tracing::info!(
            niche = %niche,
            source = %discovery_source,
            returned = ranked.len(),
            attempted_queries = round.attempted,
            successful_queries = round.successful,
            "Competitor discovery completed"
        );

        Ok(DiscoveryReport {
            niche: niche.to_string(),
            candidates: ranked,
            discovery_source,
            validation_queries: round.successful,
        })
    }
}

/// Put the self candidate first and drop later entries whose lowercase name
/// was already seen.
fn merge_candidates(
    self_candidate: Option<Candidate>,
    discovered: Vec<Candidate>,
) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(discovered.len() + 1);

    for candidate in self_candidate.into_iter().chain(discovered) {
        if seen.insert(candidate.name_key()) {
            merged.push(candidate);
        } else {
            tracing::debug!(name = %candidate.name, "Dropping duplicate candidate");
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;
    use crate::service::oracle::{OracleAnswer, OracleError};
    use crate::service::test_support::{ScriptedGenerator, ScriptedOracle};

    const NICHE: &str = "AI note-taking apps";

    const DISCOVERED: [(&str, &str); 12] = [
        ("Otter", "https://otter.ai"),
        ("Fireflies", "https://fireflies.ai"),
        ("Fathom", "https://fathom.video"),
        ("Grain", "https://grain.com"),
        ("Avoma", "https://avoma.com"),
        ("Tactiq", "https://tactiq.io"),
        ("Sembly", "https://sembly.ai"),
        ("Krisp", "https://krisp.ai"),
        ("Supernormal", "https://supernormal.com"),
        ("tl;dv", "https://tldv.io"),
        ("MeetGeek", "https://meetgeek.ai"),
        ("Jamie", "https://meetjamie.ai"),
    ];

    /// Discovery query gets a free-text answer; validation queries name
    /// four competitors (with varying coverage) plus the self brand once.
    fn note_taking_oracle() -> ScriptedOracle {
        ScriptedOracle::new(|query| {
            if query.starts_with("Goal:") {
                return Ok(OracleAnswer {
                    answer: "Otter, Fireflies, Fathom and others.".to_string(),
                    citations: vec!["https://otter.ai".to_string()],
                });
            }
            if query.starts_with("What are the best") {
                return Ok(OracleAnswer {
                    answer: "Otter, Fireflies, Fathom, Grain and NoteAI.".to_string(),
                    citations: vec!["https://www.otter.ai/blog".to_string()],
                });
            }
            if query.starts_with("Top") || query.starts_with("Which") {
                return Ok(OracleAnswer {
                    answer: "Otter, Fireflies and Fathom lead; Grain is rising.".to_string(),
                    citations: vec!["https://fireflies.ai/blog".to_string()],
                });
            }
            Ok(OracleAnswer {
                answer: "Otter and Fireflies remain popular.".to_string(),
                citations: vec![],
            })
        })
    }

    fn generator() -> ScriptedGenerator {
        ScriptedGenerator {
            parsed: Some(ScriptedGenerator::competitors(&DISCOVERED)),
            generated: Some(ScriptedGenerator::competitors(&[
                ("Otter", "https://otter.ai"),
                ("Fireflies", "https://fireflies.ai"),
                ("Fathom", "https://fathom.video"),
            ])),
            keywords: None,
        }
    }

    fn noteai() -> SelfBrand {
        SelfBrand {
            name: "NoteAI".to_string(),
            domain: Some("https://noteai.app".to_string()),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_self_brand() {
        let service = CompetitorDiscoveryService::new(
            Arc::new(note_taking_oracle()),
            Arc::new(generator()),
            None,
            "test-model",
        );

        let report = service.discover_and_validate(NICHE, Some(&noteai())).await.unwrap();

        assert_eq!(report.discovery_source, "oracle");
        assert_eq!(report.validation_queries, 5);
        assert_eq!(report.candidates.len(), 5);

        let names: Vec<&str> = report.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["NoteAI", "Fireflies", "Otter", "Fathom", "Grain"]);

        // self stays despite scoring under the cutoff
        assert!(report.candidates[0].is_self);
        assert!(report.candidates[0].score < ranking::MIN_SCORE);
        let competitor_scores: Vec<u8> = report.candidates[1..].iter().map(|c| c.score).collect();
        assert!(competitor_scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(competitor_scores.iter().all(|s| *s >= ranking::MIN_SCORE));
        assert!(report.candidates[1..]
            .iter()
            .all(|c| c.provenance == Provenance::OracleDiscovered));
    }

    #[tokio::test]
    async fn test_falls_back_to_ai_generation() {
        let oracle = Arc::new(ScriptedOracle::failing());
        let service = CompetitorDiscoveryService::new(
            oracle.clone(),
            Arc::new(generator()),
            None,
            "test-model",
        );

        let report = service.discover_and_validate(NICHE, None).await.unwrap();

        assert_eq!(report.discovery_source, "ai_fallback");
        assert_eq!(report.validation_queries, 0);
        // unscored, so relaxation keeps all three
        assert_eq!(report.candidates.len(), 3);
        assert!(report
            .candidates
            .iter()
            .all(|c| c.provenance == Provenance::AiFallbackGenerated && c.score == 0));
        // discovery query plus five validation queries
        assert_eq!(oracle.calls(), 6);
    }

    #[tokio::test]
    async fn test_parse_failure_falls_back() {
        let service = CompetitorDiscoveryService::new(
            Arc::new(note_taking_oracle()),
            Arc::new(ScriptedGenerator {
                parsed: None,
                ..generator()
            }),
            None,
            "test-model",
        );

        let report = service.discover_and_validate(NICHE, None).await.unwrap();
        assert_eq!(report.discovery_source, "ai_fallback");
    }

    #[tokio::test]
    async fn test_all_sources_exhausted_returns_self_alone() {
        let service = CompetitorDiscoveryService::new(
            Arc::new(ScriptedOracle::new(|_| Err(OracleError::EmptyAnswer))),
            Arc::new(ScriptedGenerator::default()),
            None,
            "test-model",
        );

        let report = service.discover_and_validate(NICHE, Some(&noteai())).await.unwrap();
        assert_eq!(report.discovery_source, "none");
        assert_eq!(report.candidates.len(), 1);
        assert!(report.candidates[0].is_self);

        let report = service.discover_and_validate(NICHE, None).await.unwrap();
        assert!(report.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_blank_niche_is_rejected() {
        let service = CompetitorDiscoveryService::new(
            Arc::new(ScriptedOracle::failing()),
            Arc::new(ScriptedGenerator::default()),
            None,
            "test-model",
        );

        let result = service.discover_and_validate("   ", None).await;
        assert!(matches!(result, Err(DiscoveryError::InvalidInput(_))));
    }

    #[test]
    fn test_merge_self_wins_and_first_duplicate_kept() {
        let self_candidate = Candidate::self_brand(&noteai());
        let merged = merge_candidates(
            Some(self_candidate),
            vec![
                Candidate::new("noteai", "https://other.com", Provenance::OracleDiscovered),
                Candidate::new("Otter", "https://otter.ai", Provenance::OracleDiscovered),
                Candidate::new("OTTER", "https://otter.com", Provenance::OracleDiscovered),
            ],
        );

        assert_eq!(merged.len(), 2);
        assert!(merged[0].is_self);
        assert_eq!(merged[1].domain, "otter.ai");
    }
}
