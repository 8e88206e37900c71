//! Database models for analysis run snapshots

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Pipeline that produced a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    CompetitorDiscovery,
    KeywordAggregation,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::CompetitorDiscovery => "competitor_discovery",
            RunKind::KeywordAggregation => "keyword_aggregation",
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "competitor_discovery" => Ok(RunKind::CompetitorDiscovery),
            "keyword_aggregation" => Ok(RunKind::KeywordAggregation),
            other => Err(format!("Unknown run kind: {}", other)),
        }
    }
}

/// Database representation of an analysis run
#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRunRow {
    pub id: Uuid,
    pub kind: String,
    pub subject: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A persisted pipeline result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRun {
    pub id: Uuid,
    pub kind: RunKind,
    /// Niche the run was executed for
    pub subject: String,
    /// Serialized result, shaped by `kind`
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRunRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<AnalysisRun, String> {
        Ok(AnalysisRun {
            id: self.id,
            kind: self.kind.parse()?,
            subject: self.subject,
            payload: self.payload,
            created_at: self.created_at,
        })
    }
}

/// Query parameters for listing runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRunsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub kind: Option<RunKind>,
}

/// Paginated response for runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedRuns {
    pub runs: Vec<AnalysisRun>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}
