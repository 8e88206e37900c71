pub mod candidate;
pub mod config;
pub mod extraction;
pub mod gap;
pub mod keyword;

pub use candidate::{Candidate, CitationEvidence, DiscoveryReport, Provenance, SelfBrand};
pub use config::{Config, OracleConfig, SerpConfig};
pub use gap::{CompanyProfile, GapCompetitor, GapReport, MissingKeywordCluster};
pub use keyword::{
    KeywordAggregation, KeywordRecord, KeywordRequest, KeywordSource, SourceStatus,
    SourceStatusReport,
};
