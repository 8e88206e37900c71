//! Domain normalization shared by citation matching and brand filtering
//!
//! Matching built on these values is substring-based, so a short token
//! embedded in an unrelated host or keyword will match.

use url::Url;

/// Second-level labels that sit under a two-letter country code
/// (`bbc.co.uk`, `shop.com.cn`)
const SECOND_LEVEL_LABELS: &[&str] = &["co", "com", "net", "org", "gov", "edu", "ac"];

/// Extract a comparable domain from a URL: lowercase host without a leading
/// `www.` label. Returns an empty string for empty or unparsable input, and
/// for hosts without a dot (`localhost`, placeholders such as `N/A`).
///
/// Scheme-less input (`salesforce.com/pricing`) is parsed as `https://`.
pub fn extract_domain(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{}", trimmed))
    };

    let host = match parsed.ok().as_ref().and_then(|u| u.host_str()) {
        Some(h) => h.to_lowercase(),
        None => return String::new(),
    };

    let domain = normalize_host(&host);
    if !domain.contains('.') {
        return String::new();
    }
    domain
}

/// Lowercase a host and strip a leading `www.` label
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Reduce a normalized domain to its registrable label
/// (`app.hubspot.com` -> `hubspot`, `bbc.co.uk` -> `bbc`)
pub fn brand_token(domain: &str) -> String {
    let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();

    match labels.len() {
        0 => String::new(),
        1 => labels[0].to_string(),
        n => {
            let tld = labels[n - 1];
            let second = labels[n - 2];
            if n >= 3 && tld.len() == 2 && SECOND_LEVEL_LABELS.contains(&second) {
                labels[n - 3].to_string()
            } else {
                second.to_string()
            }
        }
    }
}

/// Brand token for a URL, empty when the URL has no usable host
pub fn brand_token_from_url(url: &str) -> String {
    brand_token(&extract_domain(url))
}
