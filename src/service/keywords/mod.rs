//! Keyword aggregation across SERP, gap-report and AI producers
//!
//! Producers run concurrently and fail independently. Their records are
//! merged in source order (serp, gap, ai), deduplicated by normalized text
//! with the first record winning, and filtered against competitor brand
//! tokens.

pub mod brands;
pub mod error;
pub mod prompts;
pub mod producers;

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{
    KeywordAggregation, KeywordRecord, KeywordRequest, KeywordSource, SourceStatus,
    SourceStatusReport,
};
use crate::service::llm::TextGenerator;
use crate::service::serp::SerpSearch;

pub use error::KeywordSourceError;
pub use producers::{AiKeywordProducer, GapKeywordProducer, KeywordProducer, SerpKeywordProducer};

/// Service for aggregating keyword evidence
pub struct KeywordAggregationService {
    serp: Arc<dyn KeywordProducer>,
    gap: Arc<dyn KeywordProducer>,
    ai: Arc<dyn KeywordProducer>,
}

impl KeywordAggregationService {
    pub fn new(
        serp: Arc<dyn SerpSearch>,
        generator: Arc<dyn TextGenerator>,
        location: &str,
        max_keywords: usize,
    ) -> Self {
        Self::with_producers(
            Arc::new(SerpKeywordProducer::new(serp, location, max_keywords)),
            Arc::new(GapKeywordProducer),
            Arc::new(AiKeywordProducer::new(generator)),
        )
    }

    pub fn with_producers(
        serp: Arc<dyn KeywordProducer>,
        gap: Arc<dyn KeywordProducer>,
        ai: Arc<dyn KeywordProducer>,
    ) -> Self {
        Self { serp, gap, ai }
    }

    /// Collect, merge and brand-filter keywords for one request
    pub async fn aggregate_keywords(&self, request: &KeywordRequest) -> KeywordAggregation {
        let (serp, gap, ai) = futures::join!(
            run_producer(self.serp.as_ref(), request),
            run_producer(self.gap.as_ref(), request),
            run_producer(self.ai.as_ref(), request),
        );

        let (serp_records, serp_status) = serp;
        let (gap_records, gap_status) = gap;
        let (ai_records, ai_status) = ai;

        let competitor_brands =
            brands::competitor_brands(&request.competitor_urls, request.gap_report.as_ref());

        let keywords = merge_keywords(
            [
                (KeywordSource::Serp, serp_records),
                (KeywordSource::CompetitorGap, gap_records),
                (KeywordSource::AiGenerated, ai_records),
            ],
            &competitor_brands,
        );

        tracing::info!(
            niche = %request.niche,
            keywords = keywords.len(),
            brands = competitor_brands.len(),
            serp = %serp_status.status,
            gap = %gap_status.status,
            ai = %ai_status.status,
            "Keyword aggregation completed"
        );

        KeywordAggregation {
            keywords,
            sources: SourceStatusReport {
                serp: serp_status,
                gap: gap_status,
                ai: ai_status,
            },
            competitor_brands,
        }
    }
}

/// Run one producer, converting its outcome into records plus a status
async fn run_producer(
    producer: &dyn KeywordProducer,
    request: &KeywordRequest,
) -> (Vec<KeywordRecord>, SourceStatus) {
    if !producer.applies(request) {
        tracing::debug!(source = ?producer.source(), "Keyword producer skipped");
        return (Vec::new(), SourceStatus::skipped());
    }

    let start_time = std::time::Instant::now();
    match producer.produce(request).await {
        Ok(records) => {
            tracing::debug!(
                source = ?producer.source(),
                count = records.len(),
                elapsed_ms = start_time.elapsed().as_millis(),
                "Keyword producer completed"
            );
            let status = SourceStatus::ok(records.len());
            (records, status)
        }
        Err(e) => {
            tracing::warn!(
                source = ?producer.source(),
                error = %e,
                elapsed_ms = start_time.elapsed().as_millis(),
                "Keyword producer failed"
            );
            (Vec::new(), SourceStatus::error(e))
        }
    }
}

/// Merge producer outputs in `KeywordSource::ORDER`.
///
/// A record is dropped when its normalized key is empty, was already seen,
/// or contains any brand token. Kept records are returned unchanged in
/// first-seen order.
pub fn merge_keywords(
    mut batches: [(KeywordSource, Vec<KeywordRecord>); 3],
    competitor_brands: &[String],
) -> Vec<KeywordRecord> {
    batches.sort_by_key(|(source, _)| {
        KeywordSource::ORDER
            .iter()
            .position(|s| s == source)
            .unwrap_or(KeywordSource::ORDER.len())
    });

    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for (_, records) in batches {
        for record in records {
            let key = record.normalized_key();
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            if brands::mentions_brand(&key, competitor_brands) {
                tracing::debug!(keyword = %record.keyword, "Dropping branded keyword");
                continue;
            }
            seen.insert(key);
            merged.push(record);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::extraction::{ExtractedKeyword, ExtractedKeywords};
    use crate::model::{GapCompetitor, GapReport, MissingKeywordCluster};
    use crate::service::serp::{RelatedSearch, SerpResponse};
    use crate::service::test_support::{ScriptedGenerator, ScriptedSerp};

    fn record(keyword: &str, source: KeywordSource) -> KeywordRecord {
        KeywordRecord::new(keyword, source)
    }

    #[test]
    fn test_duplicate_across_sources_keeps_earliest() {
        let merged = merge_keywords(
            [
                (
                    KeywordSource::AiGenerated,
                    vec![record("best crm software", KeywordSource::AiGenerated)],
                ),
                (
                    KeywordSource::CompetitorGap,
                    vec![record("Best CRM Software ", KeywordSource::CompetitorGap)],
                ),
                (
                    KeywordSource::Serp,
                    vec![record("BEST CRM SOFTWARE", KeywordSource::Serp)],
                ),
            ],
            &[],
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, KeywordSource::Serp);
        assert_eq!(merged[0].keyword, "BEST CRM SOFTWARE");
    }

    #[test]
    fn test_brand_filter_applies_to_every_source() {
        let brands = brands::competitor_brands(&["https://www.salesforce.com".to_string()], None);
        let merged = merge_keywords(
            [
                (
                    KeywordSource::Serp,
                    vec![record("salesforce alternatives for startups", KeywordSource::Serp)],
                ),
                (
                    KeywordSource::CompetitorGap,
                    vec![record("sales force planning", KeywordSource::CompetitorGap)],
                ),
                (
                    KeywordSource::AiGenerated,
                    vec![record("Salesforce pricing explained", KeywordSource::AiGenerated)],
                ),
            ],
            &brands,
        );

        let keywords: Vec<&str> = merged.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["sales force planning"]);
    }

    #[test]
    fn test_blank_keywords_dropped_and_order_preserved() {
        let merged = merge_keywords(
            [
                (
                    KeywordSource::Serp,
                    vec![
                        record("zeta crm", KeywordSource::Serp),
                        record("   ", KeywordSource::Serp),
                        record("alpha crm", KeywordSource::Serp),
                    ],
                ),
                (KeywordSource::CompetitorGap, vec![]),
                (KeywordSource::AiGenerated, vec![record("beta crm", KeywordSource::AiGenerated)]),
            ],
            &[],
        );

        let keywords: Vec<&str> = merged.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["zeta crm", "alpha crm", "beta crm"]);
    }

    #[tokio::test]
    async fn test_aggregate_with_failing_and_skipped_producers() {
        // SERP only knows one of the template queries; the AI generator fails
        let serp = ScriptedSerp::default().with(
            "best crm to buy",
            SerpResponse {
                related_searches: vec![
                    RelatedSearch {
                        query: "best crm software".to_string(),
                    },
                    RelatedSearch {
                        query: "hubspot vs pipedrive".to_string(),
                    },
                ],
                ..Default::default()
            },
        );
        let service = KeywordAggregationService::new(
            Arc::new(serp),
            Arc::new(ScriptedGenerator::default()),
            "United States",
            50,
        );

        let request = KeywordRequest {
            niche: "crm".to_string(),
            domain: "pipely.io".to_string(),
            profile: Some(Default::default()),
            gap_report: Some(GapReport {
                missing_keywords: vec![MissingKeywordCluster {
                    cluster: "comparison".to_string(),
                    keywords: vec!["Best CRM software".to_string(), "crm for agencies".to_string()],
                    priority: "High".to_string(),
                }],
                competitors: vec![GapCompetitor {
                    name: Some("HubSpot".to_string()),
                    url: None,
                }],
                ..Default::default()
            }),
            competitor_urls: vec![],
            custom_queries: None,
        };

        let aggregation = service.aggregate_keywords(&request).await;

        assert_eq!(aggregation.sources.serp, SourceStatus::ok(2));
        assert_eq!(aggregation.sources.gap, SourceStatus::ok(2));
        assert!(aggregation.sources.ai.is_error());
        assert_eq!(aggregation.competitor_brands, vec!["hubspot"]);

        let keywords: Vec<(&str, KeywordSource)> = aggregation
            .keywords
            .iter()
            .map(|r| (r.keyword.as_str(), r.source))
            .collect();
        assert_eq!(
            keywords,
            vec![
                ("best crm software", KeywordSource::Serp),
                ("crm for agencies", KeywordSource::CompetitorGap),
            ]
        );
    }

    #[tokio::test]
    async fn test_aggregate_without_optional_inputs() {
        let generator = ScriptedGenerator {
            keywords: Some(ExtractedKeywords {
                keywords: vec![ExtractedKeyword {
                    keyword: "crm onboarding checklist".to_string(),
                    title: None,
                    intent: None,
                    estimated_words: None,
                    template: None,
                }],
            }),
            ..Default::default()
        };
        let serp = Arc::new(ScriptedSerp::default());
        let service =
            KeywordAggregationService::new(serp.clone(), Arc::new(generator), "United States", 50);

        let request = KeywordRequest {
            niche: "crm".to_string(),
            ..Default::default()
        };
        let aggregation = service.aggregate_keywords(&request).await;

        // every SERP query failed, so the source reports an error
        assert!(aggregation.sources.serp.is_error());
        assert_eq!(aggregation.sources.serp.count, 0);
        assert_eq!(serp.seen_queries().len(), 5);
        assert_eq!(aggregation.sources.gap, SourceStatus::skipped());
        assert_eq!(aggregation.sources.ai, SourceStatus::skipped());
        assert!(aggregation.keywords.is_empty());
    }
}
