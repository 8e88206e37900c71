pub mod cache;
pub mod cache_keys;
pub mod discovery;
pub mod domain;
pub mod keywords;
pub mod llm;
pub mod oracle;
pub mod serp;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::IntelCache;
pub use discovery::CompetitorDiscoveryService;
pub use keywords::KeywordAggregationService;
pub use llm::{LlmClient, LlmTextGenerator, TextGenerator};
pub use oracle::{KnowledgeOracle, PerplexityClient};
pub use serp::{SerpApiClient, SerpSearch};
