// src/core/scanner/tech_scanner.rs

use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use tracing::debug;

use crate::core::catalog::SIGNATURES;
use crate::core::models::{Bucket, Classification};

/// Matches the fetched body text and header values against the signature
/// catalog and groups the hits into the four output buckets.
///
/// A signature is present as soon as its pattern hits the body or the
/// string form of any header value. Pure: the result depends only on
/// (body, headers, catalog) and not on catalog iteration order.
pub fn classify(body: &str, headers: &HeaderMap) -> Classification {
    let header_values: Vec<String> = headers
        .iter()
        .map(|(_, value)| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();

    let mut result = Classification::default();
    for signature in SIGNATURES {
        let matched = signature.pattern.is_match(body)
            || header_values.iter().any(|value| signature.pattern.is_match(value));
        if !matched {
            continue;
        }

        result.raw.push(signature.name.to_string());
        match signature.bucket {
            Some(Bucket::Cms) => result.cms.push(signature.name.to_string()),
            Some(Bucket::JsLibs) => result.js_libs.push(signature.name.to_string()),
            Some(Bucket::Analytics) => result.analytics.push(signature.name.to_string()),
            Some(Bucket::CustomTags) => result.custom_tags.push(signature.name.to_string()),
            None => {}
        }
    }

    debug!(matches = result.raw.len(), "Classified response.");
    result
}

/// Extracts the first `<title>` text from the page, trimmed. Empty titles
/// are treated as absent.
pub fn extract_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn wordpress_body_classifies_as_cms_only() {
        let detected = classify("<a href=\"/wp-content/themes/x/style.css\">", &HeaderMap::new());
        assert_eq!(detected.cms, vec!["WordPress"]);
        assert!(detected.js_libs.is_empty());
        assert!(detected.analytics.is_empty());
        assert!(detected.custom_tags.is_empty());
        assert_eq!(detected.raw, vec!["WordPress"]);
    }

    #[test]
    fn matches_header_values() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("cloudflare"));
        let detected = classify("<html></html>", &headers);
        assert_eq!(detected.custom_tags, vec!["Cloudflare"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let detected = classify("<script src=\"REACT.production.min.js\"></script>", &HeaderMap::new());
        assert!(detected.js_libs.contains(&"React".to_string()));
    }

    #[test]
    fn is_deterministic() {
        let body = "wp-content jquery stripe googletagmanager bootstrap";
        let first = classify(body, &HeaderMap::new());
        let second = classify(body, &HeaderMap::new());
        assert_eq!(first, second);
    }

    #[test]
    fn unmapped_signatures_appear_in_raw_only() {
        let detected = classify("<link href=\"bootstrap.min.css\">", &HeaderMap::new());
        assert_eq!(detected.raw, vec!["Bootstrap"]);
        assert!(detected.cms.is_empty());
        assert!(detected.js_libs.is_empty());
        assert!(detected.analytics.is_empty());
        assert!(detected.custom_tags.is_empty());
    }

    #[test]
    fn buckets_partition_the_raw_match_list() {
        let body = "wp-content drupal jquery react gtag( stripe cloudflare index.php tailwind";
        let detected = classify(body, &HeaderMap::new());

        let raw: HashSet<&String> = detected.raw.iter().collect();
        let mut bucketed: Vec<&String> = Vec::new();
        bucketed.extend(&detected.cms);
        bucketed.extend(&detected.js_libs);
        bucketed.extend(&detected.analytics);
        bucketed.extend(&detected.custom_tags);

        // Every bucketed name is backed by raw evidence, and no name lands
        // in more than one bucket.
        let unique: HashSet<&String> = bucketed.iter().copied().collect();
        assert_eq!(unique.len(), bucketed.len());
        assert!(unique.is_subset(&raw));
    }

    #[test]
    fn empty_body_matches_nothing() {
        let detected = classify("", &HeaderMap::new());
        assert!(detected.raw.is_empty());
    }

    #[test]
    fn extracts_and_trims_title() {
        assert_eq!(
            extract_title("<html><head><title>  Acme Store </title></head></html>"),
            Some("Acme Store".to_string())
        );
        assert_eq!(extract_title("<html><head><title></title></head></html>"), None);
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
    }
}
