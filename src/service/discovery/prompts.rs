//! Prompts for candidate discovery and citation validation

/// System instruction for the broad oracle discovery query
pub const DISCOVERY_ORACLE_SYSTEM_PROMPT: &str = r#"You are a senior competitive-intelligence analyst. Your job is to find the brands that genuinely compete for the same customers.

Key principles:
- If the input is a specific brand, list its direct competitors in the same category (e.g. Apple -> Samsung, Huawei, Google Pixel).
- If the input is an industry or product category, list the top players in that market.
- Only list real brands with a meaningful market share, and give an accurate official website URL for each.
- Prefer listing a few extra brands over missing an important one; later steps will filter the list."#;

/// System prompt for turning the oracle answer into structured candidates
pub const PARSE_CANDIDATES_SYSTEM_PROMPT: &str = r#"You are a data extraction specialist. Extract competitor brands from search results into the requested structure.

## Rules

- Extract as many distinct brands as the text supports (aim for 10-15).
- `name` is the brand or company name exactly as it is commonly written.
- `url` must be the brand's official website. Use the cited sources to confirm it when possible; otherwise give your best guess of the official homepage.
- `strengths` is one sentence on the brand's competitive advantage.
- `products` is a short list of its main products or services.
- Always set `score` to 0. It is recomputed later.
- Never invent brands that do not appear in the search results."#;

/// System prompt for the ungrounded AI-only fallback
pub const DISCOVERY_FALLBACK_SYSTEM_PROMPT: &str = r#"You are a market research expert. You identify the most relevant competing brands for a market or brand from your own knowledge.

## Rules

- Return between 5 and 8 real brands.
- Include each brand's official website URL.
- Describe each brand's strengths and main products briefly.
- Set `score` to 0 for every brand."#;

/// Neutral system instruction used for validation queries
pub const VALIDATION_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Provide accurate, well-sourced information.";

/// Fixed validation panel; `{niche}` is substituted per run
const VALIDATION_QUERY_TEMPLATES: [&str; 5] = [
    "What are the best {niche} brands/products in 2025?",
    "Top {niche} competitors comparison and market share analysis",
    "Which {niche} companies are the market leaders for enterprises?",
    "Expert recommendations: best {niche} alternatives",
    "{niche} industry analysis: key players and trends 2025",
];

/// Build the broad discovery query sent to the oracle
pub fn build_discovery_query(niche: &str) -> String {
    format!(
        r#"Goal: find the competitors of "{niche}".

Decide first:
1. If "{niche}" is a specific brand (e.g. Apple, Nike, Salesforce), list its direct competitors (e.g. Samsung, Adidas, HubSpot).
2. If "{niche}" is an industry or product category (e.g. CRM, running shoes, smartphones), list the market leaders in that space.

List the 10-15 most relevant competing brands or companies.
For every brand include: name, official website URL, core products/services, competitive advantage.
Only list brands that really exist and hold meaningful market share."#
    )
}

/// Build the prompt that asks the text generator to structure the oracle answer
pub fn build_parse_prompt(niche: &str, answer: &str, citations: &[String]) -> String {
    let sources = if citations.is_empty() {
        "(none)".to_string()
    } else {
        citations
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Below are search results about competitors for "{niche}". Extract the structured competitor list.

Search results:
---
{answer}
---

Cited sources:
{sources}"#
    )
}

/// Build the AI-only fallback prompt
pub fn build_fallback_prompt(niche: &str) -> String {
    format!(
        r#"List the 5-8 most important competing brands for "{niche}".
If "{niche}" is a brand, list its direct competitors; if it is a market, list the market leaders."#
    )
}

/// Build the validation query panel for a niche
pub fn build_validation_queries(niche: &str) -> Vec<String> {
    VALIDATION_QUERY_TEMPLATES
        .iter()
        .map(|t| t.replace("{niche}", niche))
        .collect()
}
