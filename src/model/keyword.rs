use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::gap::{CompanyProfile, GapReport};

/// Producer that supplied a keyword record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Serp,
    CompetitorGap,
    AiGenerated,
}

impl KeywordSource {
    /// Aggregation order: first-seen wins, so this order decides ties
    pub const ORDER: [KeywordSource; 3] = [
        KeywordSource::Serp,
        KeywordSource::CompetitorGap,
        KeywordSource::AiGenerated,
    ];
}

// A keyword candidate plus whatever metadata its producer attached.
// Only the fields relevant to `source` are populated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KeywordRecord {
    pub keyword: String,
    pub source: KeywordSource,
    /// SERP query that surfaced the keyword
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serp_position: Option<u32>,
    /// Organic rank of the requesting domain for `query`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_ranking: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default)]
    pub is_long_tail: bool,
    #[serde(default)]
    pub is_question: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_words: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl KeywordRecord {
    pub fn new(keyword: impl Into<String>, source: KeywordSource) -> Self {
        Self {
            keyword: keyword.into(),
            source,
            query: None,
            serp_position: None,
            our_ranking: None,
            snippet: None,
            is_long_tail: false,
            is_question: false,
            cluster: None,
            priority: None,
            intent: None,
            title: None,
            estimated_words: None,
            template: None,
        }
    }

    /// Deduplication key: trimmed, lowercased keyword text
    pub fn normalized_key(&self) -> String {
        self.keyword.trim().to_lowercase()
    }
}

/// Inputs for one keyword aggregation run
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct KeywordRequest {
    /// Topic used to template SERP queries
    pub niche: String,
    /// Requesting domain, used for `our_ranking`
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub profile: Option<CompanyProfile>,
    #[serde(default)]
    pub gap_report: Option<GapReport>,
    /// Explicit competitor URLs whose brand tokens are filtered out
    #[serde(default)]
    pub competitor_urls: Vec<String>,
    /// Simulation queries replacing the SERP templates when non-empty
    #[serde(default)]
    pub custom_queries: Option<Vec<String>>,
}

/// Outcome of one producer within an aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceStatus {
    /// Records the producer returned before deduplication and brand filtering
    pub count: usize,
    /// `ok`, `skipped`, or `error: <message>`
    pub status: String,
}

impl SourceStatus {
    pub fn ok(count: usize) -> Self {
        Self {
            count,
            status: "ok".to_string(),
        }
    }

    pub fn skipped() -> Self {
        Self {
            count: 0,
            status: "skipped".to_string(),
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            count: 0,
            status: format!("error: {}", message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.starts_with("error")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceStatusReport {
    pub serp: SourceStatus,
    pub gap: SourceStatus,
    pub ai: SourceStatus,
}

/// Deduplicated, brand-filtered keyword list plus per-source status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KeywordAggregation {
    pub keywords: Vec<KeywordRecord>,
    pub sources: SourceStatusReport,
    /// Competitor brand tokens used for filtering
    pub competitor_brands: Vec<String>,
}
