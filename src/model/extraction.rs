//! LLM-extractable models for candidate discovery and keyword generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// LLM-extractable competitor list
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedCandidates {
    #[serde(default)]
    pub competitors: Vec<ExtractedCandidate>,
}

/// A single competitor as emitted by the text generator
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedCandidate {
    pub name: String,
    /// Official website URL (best guess)
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub products: Option<String>,
    /// Placeholder, always recomputed by citation validation
    #[serde(default)]
    pub score: Option<u32>,
}

/// LLM-extractable keyword list
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedKeywords {
    #[serde(default)]
    pub keywords: Vec<ExtractedKeyword>,
}

/// A single generated keyword
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedKeyword {
    pub keyword: String,
    /// Suggested article title for the keyword
    #[serde(default)]
    pub title: Option<String>,
    /// Informational, Commercial or Transactional
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub estimated_words: Option<u32>,
    /// Content template, e.g. "listicle", "comparison", "how-to"
    #[serde(default)]
    pub template: Option<String>,
}
