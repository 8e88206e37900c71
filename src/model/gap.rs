use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gap analysis report comparing a company with its competitors
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub competitor_gaps: Vec<CompetitorGap>,
    #[serde(default)]
    pub missing_keywords: Vec<MissingKeywordCluster>,
    #[serde(default)]
    pub structural_gaps: Vec<StructuralGap>,
    #[serde(default)]
    pub suggestions: Vec<GapSuggestion>,
    /// Competitors the report was produced against
    #[serde(default)]
    pub competitors: Vec<GapCompetitor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CompetitorGap {
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MissingKeywordCluster {
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuralGap {
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub why_needed: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GapSuggestion {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub expected_outcome: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GapCompetitor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Company profile used to ground AI keyword generation
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub unique_selling_point: String,
    #[serde(default)]
    pub landing_page: String,
}
