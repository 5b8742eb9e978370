// src/core/scanner/whois_scanner.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::task::spawn_blocking;
use tracing::{debug, warn};
use whois_rust::{WhoIs, WhoIsError, WhoIsLookupOptions};

use crate::core::models::Resolution;

/// Registration-record lookup seam, injectable for tests.
pub trait Resolve {
    fn resolve(&self, domain: &str) -> impl Future<Output = Resolution> + Send;
}

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimal WHOIS server map. The empty key is the IANA fallback used for
/// any TLD not listed here.
const WHOIS_SERVERS: &str = r#"{
    "com": "whois.verisign-grs.com",
    "net": "whois.verisign-grs.com",
    "org": "whois.pir.org",
    "io": "whois.nic.io",
    "co": "whois.nic.co",
    "dev": "whois.nic.google",
    "app": "whois.nic.google",
    "": "whois.iana.org"
}"#;

/// Registration fields consulted in order; the first non-empty,
/// non-redacted value wins.
static FIELD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?im)^\s*Organization:\s*(.+)$",
        r"(?im)^\s*Registrant Organization:\s*(.+)$",
        r"(?im)^\s*Registrant Name:\s*(.+)$",
        r"(?im)^\s*Registrant Company:\s*(.+)$",
        r"(?im)^\s*Name:\s*(.+)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Resolves the registered organization behind a domain via WHOIS.
/// Lookup failure is never fatal to a scan; it only degrades the recorded
/// company field to the unresolved sentinel.
pub struct WhoisResolver {
    client: Arc<WhoIs>,
}

impl WhoisResolver {
    pub fn new() -> Result<Self, WhoIsError> {
        Ok(Self { client: Arc::new(WhoIs::from_string(WHOIS_SERVERS)?) })
    }
}

impl Resolve for WhoisResolver {
    async fn resolve(&self, domain: &str) -> Resolution {
        let options = match WhoIsLookupOptions::from_string(domain) {
            Ok(options) => options,
            Err(e) => return Resolution::Failed(format!("invalid lookup target: {e:?}")),
        };

        // The lookup is blocking socket I/O, so it runs on the blocking pool
        // with its own deadline.
        let client = Arc::clone(&self.client);
        let lookup = spawn_blocking(move || client.lookup(options));
        match tokio::time::timeout(LOOKUP_TIMEOUT, lookup).await {
            Ok(Ok(Ok(record))) => match first_registrant_field(&record) {
                Some(name) => {
                    debug!(domain, company = %name, "Resolved registrant organization.");
                    Resolution::Resolved(name)
                }
                None => {
                    debug!(domain, "WHOIS record carries no usable registrant field.");
                    Resolution::Unresolved
                }
            },
            Ok(Ok(Err(e))) => {
                warn!(domain, error = ?e, "WHOIS lookup failed.");
                Resolution::Failed(format!("whois lookup failed: {e:?}"))
            }
            Ok(Err(e)) => {
                warn!(domain, error = %e, "WHOIS lookup task failed.");
                Resolution::Failed(format!("whois task failed: {e}"))
            }
            Err(_) => {
                warn!(domain, "WHOIS lookup timed out.");
                Resolution::Failed("whois lookup timed out".to_string())
            }
        }
    }
}

/// Walks the candidate registration fields in priority order and returns
/// the first trimmed value that is neither empty nor marked redacted.
fn first_registrant_field(record: &str) -> Option<String> {
    for pattern in FIELD_PATTERNS.iter() {
        for captures in pattern.captures_iter(record) {
            if let Some(value) = captures.get(1) {
                let value = value.as_str().trim();
                if !value.is_empty() && !value.to_uppercase().contains("REDACTED") {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
