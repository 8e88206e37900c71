//! Keyword producers: SERP harvesting, gap-report extraction and AI generation

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::model::{GapReport, KeywordRecord, KeywordRequest, KeywordSource};
use crate::service::llm::TextGenerator;
use crate::service::serp::{SerpError, SerpResponse, SerpSearch};

use super::error::KeywordSourceError;

const SERP_QUERY_TEMPLATES: [&str; 5] = [
    "best {niche} to buy",
    "{niche} buying guide",
    "top rated {niche} reviews",
    "cheap {niche} deals",
    "{niche} vs",
];

/// Phrases marking research or career queries rather than buyer intent
const NEGATIVE_TERMS: [&str; 15] = [
    "what is",
    "define",
    "meaning",
    "definition",
    "benefit",
    "statistics",
    "report",
    "size",
    "trends",
    "job",
    "salary",
    "hiring",
    "wiki",
    "history of",
    "examples",
];

const MIN_KEYWORD_CHARS: usize = 3;

const RELATED_SEARCH_INTENT: &str = "Commercial";
const RELATED_QUESTION_INTENT: &str = "Informational/Commercial";

/// One source of keyword records
#[async_trait]
pub trait KeywordProducer: Send + Sync {
    fn source(&self) -> KeywordSource;

    /// Whether the request carries the input this producer needs;
    /// producers that do not apply are reported as skipped
    fn applies(&self, request: &KeywordRequest) -> bool;

    async fn produce(&self, request: &KeywordRequest)
    -> Result<Vec<KeywordRecord>, KeywordSourceError>;
}

/// Harvests related searches and "people also ask" questions from Google
pub struct SerpKeywordProducer {
    serp: Arc<dyn SerpSearch>,
    location: String,
    max_keywords: usize,
}

impl SerpKeywordProducer {
    pub fn new(
        serp: Arc<dyn SerpSearch>,
        location: impl Into<String>,
        max_keywords: usize,
    ) -> Self {
        Self {
            serp,
            location: location.into(),
            max_keywords,
        }
    }

    /// Caller-supplied simulation queries, or the niche templates
    pub fn queries(request: &KeywordRequest) -> Vec<String> {
        let custom: Vec<String> = request
            .custom_queries
            .iter()
            .flatten()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();

        if !custom.is_empty() {
            return custom;
        }

        let niche = request.niche.trim();
        if niche.is_empty() {
            return Vec::new();
        }

        SERP_QUERY_TEMPLATES
            .iter()
            .map(|t| t.replace("{niche}", niche))
            .collect()
    }
}

/// Reject short text and research/career phrasing
pub fn is_buyer_keyword(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if text.chars().count() < MIN_KEYWORD_CHARS {
        return false;
    }
    !NEGATIVE_TERMS.iter().any(|term| text.contains(term))
}

/// Turn one SERP page into keyword records, skipping keys already in `seen`
fn harvest(
    query: &str,
    response: &SerpResponse,
    domain: &str,
    seen: &mut HashSet<String>,
) -> Vec<KeywordRecord> {
    let our_ranking = response.rank_of(domain);
    let mut records = Vec::new();

    for (idx, related) in response.related_searches.iter().enumerate() {
        let text = related.query.trim();
        if !is_buyer_keyword(text) || !seen.insert(text.to_lowercase()) {
            continue;
        }
        let mut record = KeywordRecord::new(text, KeywordSource::Serp);
        record.query = Some(query.to_string());
        record.serp_position = Some(idx as u32 + 1);
        record.our_ranking = our_ranking;
        record.snippet = Some("Related search".to_string());
        record.is_long_tail = true;
        record.intent = Some(RELATED_SEARCH_INTENT.to_string());
        records.push(record);
    }

    for (idx, question) in response.related_questions.iter().enumerate() {
        let text = question.question.trim();
        if !is_buyer_keyword(text) || !seen.insert(text.to_lowercase()) {
            continue;
        }
        let mut record = KeywordRecord::new(text, KeywordSource::Serp);
        record.query = Some(query.to_string());
        record.serp_position = Some(idx as u32 + 1);
        record.our_ranking = our_ranking;
        record.snippet = question.snippet.clone();
        record.is_question = true;
        record.intent = Some(RELATED_QUESTION_INTENT.to_string());
        records.push(record);
    }

    records
}

#[async_trait]
impl KeywordProducer for SerpKeywordProducer {
    fn source(&self) -> KeywordSource {
        KeywordSource::Serp
    }

    fn applies(&self, request: &KeywordRequest) -> bool {
        !Self::queries(request).is_empty()
    }

    async fn produce(
        &self,
        request: &KeywordRequest,
    ) -> Result<Vec<KeywordRecord>, KeywordSourceError> {
        let queries = Self::queries(request);

        let futures: Vec<_> = queries
            .iter()
            .map(|q| self.serp.search(q, &self.location))
            .collect();
        let results = join_all(futures).await;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut succeeded = 0usize;
        let mut last_error = None;

        for (query, result) in queries.iter().zip(results) {
            match result {
                Ok(response) => {
                    succeeded += 1;
                    records.extend(harvest(query, &response, &request.domain, &mut seen));
                }
                Err(SerpError::NotConfigured) => {
                    return Err(SerpError::NotConfigured.into());
                }
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "SERP query failed, skipping");
                    last_error = Some(e);
                }
            }
        }

        // A source with no successful query is an outage, not an empty result
        if succeeded == 0
            && let Some(e) = last_error
        {
            return Err(e.into());
        }

        tracing::info!(
            queries = queries.len(),
            succeeded = succeeded,
            keywords = records.len(),
            cap = self.max_keywords,
            "SERP keyword harvest completed"
        );

        records.truncate(self.max_keywords);
        Ok(records)
    }
}

/// Extracts missing keywords from a gap report
pub struct GapKeywordProducer;

impl GapKeywordProducer {
    pub fn records(report: &GapReport) -> Vec<KeywordRecord> {
        report
            .missing_keywords
            .iter()
            .flat_map(|cluster| {
                cluster
                    .keywords
                    .iter()
                    .filter(|k| !k.trim().is_empty())
                    .map(move |keyword| {
                        let mut record =
                            KeywordRecord::new(keyword.trim(), KeywordSource::CompetitorGap);
                        record.cluster = Some(cluster.cluster.clone()).filter(|c| !c.is_empty());
                        record.priority = Some(cluster.priority.clone()).filter(|p| !p.is_empty());
                        record
                    })
            })
            .collect()
    }
}

#[async_trait]
impl KeywordProducer for GapKeywordProducer {
    fn source(&self) -> KeywordSource {
        KeywordSource::CompetitorGap
    }

    fn applies(&self, request: &KeywordRequest) -> bool {
        request.gap_report.is_some()
    }

    async fn produce(
        &self,
        request: &KeywordRequest,
    ) -> Result<Vec<KeywordRecord>, KeywordSourceError> {
        let report = request
            .gap_report
            .as_ref()
            .ok_or_else(|| KeywordSourceError::InvalidInput("gap report missing".to_string()))?;
        Ok(Self::records(report))
    }
}

/// Generates GEO keywords from the company profile
pub struct AiKeywordProducer {
    generator: Arc<dyn TextGenerator>,
}

impl AiKeywordProducer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl KeywordProducer for AiKeywordProducer {
    fn source(&self) -> KeywordSource {
        KeywordSource::AiGenerated
    }

    fn applies(&self, request: &KeywordRequest) -> bool {
        request.profile.is_some()
    }

    async fn produce(
        &self,
        request: &KeywordRequest,
    ) -> Result<Vec<KeywordRecord>, KeywordSourceError> {
        let profile = request
            .profile
            .as_ref()
            .ok_or_else(|| {
                KeywordSourceError::InvalidInput("company profile missing".to_string())
            })?;

        let generated = self.generator.generate_keywords(profile).await?;

        Ok(generated
            .keywords
            .into_iter()
            .filter(|k| !k.keyword.trim().is_empty())
            .map(|k| {
                let mut record = KeywordRecord::new(k.keyword.trim(), KeywordSource::AiGenerated);
                record.title = k.title;
                record.intent = k.intent;
                record.estimated_words = k.estimated_words;
                record.template = k.template;
                record
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MissingKeywordCluster;
    use crate::model::extraction::{ExtractedKeyword, ExtractedKeywords};
    use crate::service::serp::{OrganicResult, RelatedQuestion, RelatedSearch};
    use crate::service::test_support::{ScriptedGenerator, ScriptedSerp};

    fn serp_page(related: &[&str], questions: &[&str]) -> SerpResponse {
        SerpResponse {
            related_searches: related
                .iter()
                .map(|q| RelatedSearch { query: q.to_string() })
                .collect(),
            related_questions: questions
                .iter()
                .map(|q| RelatedQuestion {
                    question: q.to_string(),
                    snippet: Some("snippet".to_string()),
                })
                .collect(),
            organic_results: vec![
                OrganicResult {
                    position: Some(1),
                    link: "https://www.hubspot.com/crm".to_string(),
                    title: None,
                },
                OrganicResult {
                    position: Some(2),
                    link: "https://pipely.io/best-crm".to_string(),
                    title: None,
                },
            ],
        }
    }

    fn request(niche: &str) -> KeywordRequest {
        KeywordRequest {
            niche: niche.to_string(),
            domain: "pipely.io".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_buyer_keyword_filter() {
        assert!(is_buyer_keyword("best crm for startups"));
        assert!(!is_buyer_keyword("ab"));
        assert!(!is_buyer_keyword("What is a CRM"));
        assert!(!is_buyer_keyword("crm market size 2025"));
        assert!(!is_buyer_keyword("crm administrator salary"));
    }

    #[test]
    fn test_template_queries_and_custom_override() {
        let queries = SerpKeywordProducer::queries(&request("crm"));
        assert_eq!(
            queries,
            vec![
                "best crm to buy",
                "crm buying guide",
                "top rated crm reviews",
                "cheap crm deals",
                "crm vs"
            ]
        );

        let mut custom = request("crm");
        custom.custom_queries = Some(vec![" crm for dentists ".to_string(), "".to_string()]);
        assert_eq!(SerpKeywordProducer::queries(&custom), vec!["crm for dentists"]);

        assert!(SerpKeywordProducer::queries(&request("  ")).is_empty());
    }

    #[tokio::test]
    async fn test_serp_harvest_skips_failed_queries() {
        let serp = ScriptedSerp::default().with(
            "best crm to buy",
            serp_page(
                &["best crm for startups", "crm statistics", "Best CRM for startups"],
                &["Which CRM is easiest to use?"],
            ),
        );
        let producer = SerpKeywordProducer::new(Arc::new(serp), "United States", 50);

        let records = producer.produce(&request("crm")).await.unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].keyword, "best crm for startups");
        assert!(records[0].is_long_tail);
        assert_eq!(records[0].intent.as_deref(), Some("Commercial"));
        assert_eq!(records[0].our_ranking, Some(2));
        assert_eq!(records[0].query.as_deref(), Some("best crm to buy"));

        assert!(records[1].is_question);
        assert_eq!(records[1].snippet.as_deref(), Some("snippet"));
        assert_eq!(records[1].intent.as_deref(), Some("Informational/Commercial"));
    }

    #[tokio::test]
    async fn test_serp_cap() {
        let related: Vec<String> = (0..10).map(|i| format!("crm option {}", i)).collect();
        let related: Vec<&str> = related.iter().map(String::as_str).collect();
        let serp = ScriptedSerp::default().with("crm vs", serp_page(&related, &[]));
        let producer = SerpKeywordProducer::new(Arc::new(serp), "United States", 4);

        let records = producer.produce(&request("crm")).await.unwrap();
        assert_eq!(records.len(), 4);
    }

    struct UnconfiguredSerp;

    #[async_trait]
    impl SerpSearch for UnconfiguredSerp {
        async fn search(&self, _query: &str, _location: &str) -> Result<SerpResponse, SerpError> {
            Err(SerpError::NotConfigured)
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_producer_error() {
        let producer = SerpKeywordProducer::new(Arc::new(UnconfiguredSerp), "United States", 50);
        let result = producer.produce(&request("crm")).await;
        assert!(matches!(result, Err(KeywordSourceError::Serp(SerpError::NotConfigured))));
    }

    #[tokio::test]
    async fn test_all_queries_failing_is_producer_error() {
        // no scripted pages, so every query answers with status 500
        let serp = Arc::new(ScriptedSerp::default());
        let producer = SerpKeywordProducer::new(serp.clone(), "United States", 50);

        let result = producer.produce(&request("crm")).await;

        assert!(matches!(
            result,
            Err(KeywordSourceError::Serp(SerpError::Status { status: 500, .. }))
        ));
        assert_eq!(serp.seen_queries().len(), 5);
    }

    #[test]
    fn test_gap_records_carry_cluster_and_priority() {
        let report = GapReport {
            missing_keywords: vec![MissingKeywordCluster {
                cluster: "pricing".to_string(),
                keywords: vec!["crm pricing".to_string(), " ".to_string()],
                priority: "High".to_string(),
            }],
            ..Default::default()
        };

        let records = GapKeywordProducer::records(&report);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, KeywordSource::CompetitorGap);
        assert_eq!(records[0].cluster.as_deref(), Some("pricing"));
        assert_eq!(records[0].priority.as_deref(), Some("High"));
    }

    #[tokio::test]
    async fn test_ai_records_carry_generation_metadata() {
        let generator = ScriptedGenerator {
            keywords: Some(ExtractedKeywords {
                keywords: vec![ExtractedKeyword {
                    keyword: "crm for dental clinics".to_string(),
                    title: Some("The 7 Best CRMs for Dental Clinics".to_string()),
                    intent: Some("Commercial".to_string()),
                    estimated_words: Some(1800),
                    template: Some("listicle".to_string()),
                }],
            }),
            ..Default::default()
        };
        let producer = AiKeywordProducer::new(Arc::new(generator));

        let mut req = request("crm");
        assert!(!producer.applies(&req));
        req.profile = Some(Default::default());
        assert!(producer.applies(&req));

        let records = producer.produce(&req).await.unwrap();
        assert_eq!(records[0].estimated_words, Some(1800));
        assert_eq!(records[0].template.as_deref(), Some("listicle"));
    }
}
