// src/core/models.rs

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected before any I/O: the input could not be reduced to a
/// registrable domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid domain input: {input:?}")]
pub struct InvalidDomainError {
    pub input: String,
}

impl InvalidDomainError {
    pub fn new(input: &str) -> Self {
        Self { input: input.to_string() }
    }
}

/// The four categorized output buckets exposed through the read API.
/// Signatures without a bucket still show up in raw evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bucket {
    Cms,
    JsLibs,
    Analytics,
    CustomTags,
}

impl Bucket {
    /// Name of the matching array column on the `detections` table.
    pub fn column(&self) -> &'static str {
        match self {
            Bucket::Cms => "cms",
            Bucket::JsLibs => "js_libs",
            Bucket::Analytics => "analytics",
            Bucket::CustomTags => "custom_tags",
        }
    }
}

/// Outcome of a single homepage fetch.
///
/// A non-200 status is still `Ok`: the status code is recorded, not treated
/// as failure. The only success/failure boundary is whether the server was
/// reached at all.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Ok {
        status: u16,
        final_url: String,
        body: String,
        headers: HeaderMap,
    },
    Error {
        message: String,
    },
}

/// Categorized classifier output plus the full raw match list.
///
/// The four sets partition the bucketed portion of `raw`: each matched name
/// appears at most once per set and in at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub cms: Vec<String>,
    pub js_libs: Vec<String>,
    pub analytics: Vec<String>,
    pub custom_tags: Vec<String>,
    pub raw: Vec<String>,
}

/// Outcome of the identity lookup for a domain.
///
/// The three cases are kept apart so callers can later retry transient
/// lookup failures independently of the scan itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A registrant/organization name was found.
    Resolved(String),
    /// The lookup succeeded but every candidate field was empty or redacted.
    Unresolved,
    /// The lookup itself failed or timed out.
    Failed(String),
}

impl Resolution {
    /// Sentinel recorded when no organization name could be resolved.
    pub const UNRESOLVED: &'static str = "-";

    /// The company name to persist, degrading unresolved and failed
    /// lookups to the sentinel value.
    pub fn company(&self) -> &str {
        match self {
            Resolution::Resolved(name) => name,
            Resolution::Unresolved | Resolution::Failed(_) => Self::UNRESOLVED,
        }
    }
}

/// One per-domain scan result, success or failure variant.
#[derive(Debug, Clone)]
pub struct ScanRecord {
    pub domain: String,
    pub url: String,
    pub ok: bool,
    pub status: Option<u16>,
    pub title: Option<String>,
    pub hosting: Option<String>,
    pub detected: Option<Classification>,
    pub company: Resolution,
    pub error: Option<String>,
}

impl ScanRecord {
    /// Website status label as stored on the `websites` row.
    pub fn status_label(&self) -> &'static str {
        if self.ok { "ok" } else { "error" }
    }

    /// Raw evidence payload for the detection row: the full match list on
    /// success, the error text when the fetch failed.
    pub fn raw_evidence(&self) -> serde_json::Value {
        match (&self.detected, &self.error) {
            (Some(detected), _) => serde_json::json!({ "matches": detected.raw }),
            (None, Some(message)) => serde_json::json!({ "error": message }),
            (None, None) => serde_json::json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_record() -> ScanRecord {
        ScanRecord {
            domain: "example.com".to_string(),
            url: "https://example.com".to_string(),
            ok: false,
            status: None,
            title: None,
            hosting: None,
            detected: None,
            company: Resolution::Unresolved,
            error: Some("connection refused".to_string()),
        }
    }

    #[test]
    fn status_label_tracks_ok_flag() {
        let mut record = error_record();
        assert_eq!(record.status_label(), "error");
        record.ok = true;
        assert_eq!(record.status_label(), "ok");
    }

    #[test]
    fn raw_evidence_carries_error_text_on_failure() {
        let record = error_record();
        assert_eq!(
            record.raw_evidence(),
            serde_json::json!({ "error": "connection refused" })
        );
    }

    #[test]
    fn raw_evidence_carries_match_list_on_success() {
        let mut record = error_record();
        record.ok = true;
        record.error = None;
        record.detected = Some(Classification {
            cms: vec!["WordPress".to_string()],
            raw: vec!["WordPress".to_string(), "PHP".to_string()],
            ..Classification::default()
        });
        assert_eq!(
            record.raw_evidence(),
            serde_json::json!({ "matches": ["WordPress", "PHP"] })
        );
    }

    #[test]
    fn resolution_company_degrades_to_sentinel() {
        assert_eq!(Resolution::Resolved("Acme Corp".to_string()).company(), "Acme Corp");
        assert_eq!(Resolution::Unresolved.company(), "-");
        assert_eq!(Resolution::Failed("timed out".to_string()).company(), "-");
    }

    #[test]
    fn bucket_columns_match_schema() {
        assert_eq!(Bucket::Cms.column(), "cms");
        assert_eq!(Bucket::JsLibs.column(), "js_libs");
        assert_eq!(Bucket::Analytics.column(), "analytics");
        assert_eq!(Bucket::CustomTags.column(), "custom_tags");
    }
}
