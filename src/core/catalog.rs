// src/core/catalog.rs

//! The static technology signature catalog.
//!
//! Detection is data-driven: growing the catalog means adding a regex and a
//! table row, never touching the classifier. The table is process-wide and
//! read-only after the lazily compiled regexes initialize.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::models::Bucket;

/// One catalog entry: a technology name, the output bucket it belongs to
/// (if any) and the pattern evaluated against body text and header values.
pub struct Signature {
    pub name: &'static str,
    pub bucket: Option<Bucket>,
    pub pattern: &'static Lazy<Regex>,
}

// Statically compiled, case-insensitive patterns. One alternation per
// technology keeps names unique across the catalog.
static RE_WORDPRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)wp-content|wordpress").unwrap());
static RE_DRUPAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)drupal").unwrap());
static RE_JOOMLA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)joomla").unwrap());
static RE_SHOPIFY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)shopify").unwrap());
static RE_REACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)react").unwrap());
static RE_VUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)vue(\.js)?").unwrap());
static RE_ANGULAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)angular").unwrap());
static RE_NEXTJS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)_next").unwrap());
static RE_SVELTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)svelte").unwrap());
static RE_EMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ember").unwrap());
static RE_JQUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)jquery").unwrap());
static RE_BOOTSTRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)bootstrap").unwrap());
static RE_TAILWIND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)tailwind").unwrap());
static RE_GOOGLE_ANALYTICS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)googletagmanager|analytics\.js|gtag\(").unwrap());
static RE_STRIPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)stripe").unwrap());
static RE_PAYPAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)paypal").unwrap());
static RE_CLOUDFLARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cloudflare").unwrap());
static RE_AKAMAI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)akamai").unwrap());
static RE_FASTLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)fastly").unwrap());
static RE_PHP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.php").unwrap());
static RE_DJANGO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)django").unwrap());
static RE_FLASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)flask").unwrap());
static RE_LARAVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)laravel").unwrap());

/// The master signature table. Entries without a bucket are recorded in raw
/// evidence only.
pub static SIGNATURES: &[Signature] = &[
    Signature { name: "WordPress", bucket: Some(Bucket::Cms), pattern: &RE_WORDPRESS },
    Signature { name: "Drupal", bucket: Some(Bucket::Cms), pattern: &RE_DRUPAL },
    Signature { name: "Joomla", bucket: Some(Bucket::Cms), pattern: &RE_JOOMLA },
    Signature { name: "Shopify", bucket: Some(Bucket::Cms), pattern: &RE_SHOPIFY },
    Signature { name: "React", bucket: Some(Bucket::JsLibs), pattern: &RE_REACT },
    Signature { name: "Vue.js", bucket: Some(Bucket::JsLibs), pattern: &RE_VUE },
    Signature { name: "Angular", bucket: Some(Bucket::JsLibs), pattern: &RE_ANGULAR },
    Signature { name: "Next.js", bucket: Some(Bucket::JsLibs), pattern: &RE_NEXTJS },
    Signature { name: "Svelte", bucket: Some(Bucket::JsLibs), pattern: &RE_SVELTE },
    Signature { name: "Ember.js", bucket: Some(Bucket::JsLibs), pattern: &RE_EMBER },
    Signature { name: "jQuery", bucket: Some(Bucket::JsLibs), pattern: &RE_JQUERY },
    Signature { name: "Google Analytics", bucket: Some(Bucket::Analytics), pattern: &RE_GOOGLE_ANALYTICS },
    Signature { name: "Stripe", bucket: Some(Bucket::CustomTags), pattern: &RE_STRIPE },
    Signature { name: "PayPal", bucket: Some(Bucket::CustomTags), pattern: &RE_PAYPAL },
    Signature { name: "Cloudflare", bucket: Some(Bucket::CustomTags), pattern: &RE_CLOUDFLARE },
    Signature { name: "Akamai", bucket: Some(Bucket::CustomTags), pattern: &RE_AKAMAI },
    Signature { name: "Fastly", bucket: Some(Bucket::CustomTags), pattern: &RE_FASTLY },
    Signature { name: "Bootstrap", bucket: None, pattern: &RE_BOOTSTRAP },
    Signature { name: "Tailwind CSS", bucket: None, pattern: &RE_TAILWIND },
    Signature { name: "PHP", bucket: None, pattern: &RE_PHP },
    Signature { name: "Django", bucket: None, pattern: &RE_DJANGO },
    Signature { name: "Flask", bucket: None, pattern: &RE_FLASK },
    Signature { name: "Laravel", bucket: None, pattern: &RE_LARAVEL },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn signature_names_are_unique() {
        let names: HashSet<&str> = SIGNATURES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SIGNATURES.len());
    }

    #[test]
    fn patterns_are_case_insensitive() {
        for sig in SIGNATURES {
            let lowered = sig.name.to_lowercase();
            let uppered = sig.name.to_uppercase();
            // Not every name is its own pattern, but no pattern may ever
            // distinguish case.
            assert_eq!(sig.pattern.is_match(&lowered), sig.pattern.is_match(&uppered));
        }
    }
}
