use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::domain::extract_domain;

/// How a candidate entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    OracleDiscovered,
    AiFallbackGenerated,
    SelfBrand,
}

// A brand/company under competitive evaluation
// - domain: derived from url, empty when url is empty or unparsable
// - is_self: the requesting brand, never subject to the score cutoff
// - score: 0-100, stays 0 until a validation round succeeds
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Candidate {
    pub name: String,
    pub url: String,
    pub domain: String,
    pub is_self: bool,
    pub provenance: Provenance,
    pub score: u8,
    pub strengths: Option<String>,
    pub products: Option<String>,
    pub validation: Option<CitationEvidence>,
}

/// Evidence gathered for one candidate during a validation round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CitationEvidence {
    /// Successful queries whose answer named the candidate
    pub mention_count: u32,
    /// Successful queries citing the candidate's domain
    pub citation_count: u32,
    /// Integer percentage of successful queries naming the candidate
    pub mention_rate: u8,
    /// Integer percentage of successful queries citing the candidate
    pub citation_rate: u8,
    /// mention_count + citation_count
    pub evidence_count: u32,
    /// Number of validation queries that completed successfully
    pub validation_queries: u32,
}

/// The requesting brand, supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelfBrand {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Outcome of one discovery and validation run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiscoveryReport {
    pub niche: String,
    /// Self candidate first, then ranked competitors
    pub candidates: Vec<Candidate>,
    /// Strategy that produced the candidates: `oracle`, `ai_fallback` or `none`
    pub discovery_source: String,
    /// Validation queries that completed successfully
    pub validation_queries: u32,
}

const DEFAULT_SELF_BRAND_NAME: &str = "My Brand";

impl Candidate {
    pub fn new(name: &str, url: &str, provenance: Provenance) -> Self {
        let url = url.trim().to_string();
        Self {
            name: name.trim().to_string(),
            domain: extract_domain(&url),
            url,
            is_self: false,
            provenance,
            score: 0,
            strengths: None,
            products: None,
            validation: None,
        }
    }

    /// Synthesize the self candidate for a run
    pub fn self_brand(brand: &SelfBrand) -> Self {
        let name = if brand.name.trim().is_empty() {
            DEFAULT_SELF_BRAND_NAME
        } else {
            brand.name.as_str()
        };
        let mut candidate = Self::new(
            name,
            brand.domain.as_deref().unwrap_or_default(),
            Provenance::SelfBrand,
        );
        candidate.is_self = true;
        candidate
    }

    /// Case-insensitive comparison key
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_domain() {
        let c = Candidate::new(
            " Notion ",
            "https://www.Notion.so/product",
            Provenance::OracleDiscovered,
        );
        assert_eq!(c.name, "Notion");
        assert_eq!(c.domain, "notion.so");
        assert_eq!(c.score, 0);
        assert!(!c.is_self);
    }

    #[test]
    fn test_new_with_empty_url_has_empty_domain() {
        let c = Candidate::new("Otter", "", Provenance::AiFallbackGenerated);
        assert!(c.domain.is_empty());
    }

    #[test]
    fn test_self_brand_defaults_name() {
        let c = Candidate::self_brand(&SelfBrand {
            name: "  ".to_string(),
            domain: None,
        });
        assert!(c.is_self);
        assert_eq!(c.name, "My Brand");
        assert_eq!(c.provenance, Provenance::SelfBrand);
    }
}
