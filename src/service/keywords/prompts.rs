//! Prompts for AI keyword generation

use crate::model::CompanyProfile;

/// System prompt for generating GEO keywords from a company profile
pub const KEYWORD_GENERATION_SYSTEM_PROMPT: &str = r#"You are a GEO (Generative Engine Optimization) keyword strategist. You propose the questions and phrases buyers type into AI assistants and search engines when choosing a product like the one described.

## Rules

- Return 10-20 keywords.
- Prefer long-tail, buyer-intent phrasing ("best X for Y", "X vs Y", "how to choose X").
- Never include the company's own brand name or any competitor brand name in a keyword.
- For every keyword give:
  - `title`: a suggested article title targeting the keyword
  - `intent`: one of Informational, Commercial, Transactional
  - `estimated_words`: a suggested article length in words
  - `template`: the content format, e.g. listicle, comparison, how-to, guide"#;

/// Build the keyword generation prompt from a company profile
pub fn build_keyword_prompt(profile: &CompanyProfile) -> String {
    let field = |value: &str| {
        let value = value.trim();
        if value.is_empty() {
            "(unknown)".to_string()
        } else {
            value.to_string()
        }
    };

    format!(
        r#"Generate GEO keywords for this company.

Industry: {}
Region: {}
Target audience: {}
Product: {}
Unique selling point: {}
Landing page: {}"#,
        field(&profile.industry),
        field(&profile.region),
        field(&profile.target_audience),
        field(&profile.product_name),
        field(&profile.unique_selling_point),
        field(&profile.landing_page),
    )
}
