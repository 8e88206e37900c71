//! Utilities for generating cache keys for SERP responses and discovery runs

use sha2::{Digest, Sha256};

use crate::service::discovery::prompts::{
    DISCOVERY_ORACLE_SYSTEM_PROMPT, PARSE_CANDIDATES_SYSTEM_PROMPT, build_discovery_query,
};

/// Generate cache key hash for a SERP response
///
/// The key is based on:
/// - the query, trimmed and lowercased
/// - the search location
pub fn generate_serp_cache_key(query: &str, location: &str) -> String {
    let key_components = format!("{}|{}", query.trim().to_lowercase(), location.trim());
    hash_string(&key_components)
}

/// Generate cache key hash for oracle-backed discovery
///
/// The key is based on:
/// - niche, trimmed and lowercased
/// - model_id of the parsing model
/// - prompt_version (hash of the discovery and parsing prompts)
pub fn generate_discovery_cache_key(niche: &str, model_id: &str) -> String {
    let niche = niche.trim().to_lowercase();
    let prompt_content = format!(
        "{}\n{}\n{}",
        DISCOVERY_ORACLE_SYSTEM_PROMPT,
        build_discovery_query(&niche),
        PARSE_CANDIDATES_SYSTEM_PROMPT
    );
    let prompt_version = hash_string(&prompt_content);

    let key_components = format!("{}|{}|{}", niche, model_id, prompt_version);
    hash_string(&key_components)
}

/// Hash a string to a hex string using SHA256
fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}
