//! Competitor brand tokens and the substring brand filter

use std::collections::HashSet;

use crate::model::GapReport;
use crate::service::domain::brand_token_from_url;

/// Tokens of this length or shorter are ignored
const MIN_TOKEN_EXCLUSIVE: usize = 2;

/// Collect brand tokens from explicit competitor URLs and the gap report's
/// competitor list (names and URL-derived tokens), deduplicated in first-seen
/// order.
pub fn competitor_brands(
    competitor_urls: &[String],
    gap_report: Option<&GapReport>,
) -> Vec<String> {
    let url_tokens = competitor_urls.iter().map(|url| brand_token_from_url(url));

    let gap_tokens = gap_report
        .into_iter()
        .flat_map(|report| report.competitors.iter())
        .flat_map(|competitor| {
            let name = competitor.name.as_deref().map(|n| n.trim().to_lowercase());
            let url = competitor.url.as_deref().map(brand_token_from_url);
            name.into_iter().chain(url)
        });

    let mut seen = HashSet::new();
    url_tokens
        .chain(gap_tokens)
        .filter(|token| token.chars().count() > MIN_TOKEN_EXCLUSIVE)
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// True when any brand token is a substring of the normalized keyword
pub fn mentions_brand(normalized_keyword: &str, brands: &[String]) -> bool {
    brands
        .iter()
        .any(|brand| normalized_keyword.contains(brand.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GapCompetitor;

    #[test]
    fn test_tokens_from_urls_and_gap_report() {
        let report = GapReport {
            competitors: vec![
                GapCompetitor {
                    name: Some(" HubSpot ".to_string()),
                    url: Some("https://www.hubspot.com".to_string()),
                },
                GapCompetitor {
                    name: Some("Zoho".to_string()),
                    url: None,
                },
                GapCompetitor {
                    name: Some("HP".to_string()),
                    url: Some("https://hp.com".to_string()),
                },
            ],
            ..Default::default()
        };

        let brands = competitor_brands(
            &["https://www.salesforce.com".to_string(), "".to_string()],
            Some(&report),
        );
        assert_eq!(brands, vec!["salesforce", "hubspot", "zoho"]);
    }

    #[test]
    fn test_no_inputs_no_brands() {
        assert!(competitor_brands(&[], None).is_empty());
    }

    #[test]
    fn test_mentions_brand_is_substring_based() {
        let brands = vec!["salesforce".to_string()];
        assert!(mentions_brand("salesforce alternatives for startups", &brands));
        assert!(!mentions_brand("sales force planning", &brands));

        // Substring matching also hits brand names embedded in ordinary words
        let brands = vec!["monday".to_string()];
        assert!(mentions_brand("monday morning pipeline review", &brands));
    }
}
