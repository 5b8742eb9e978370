// src/core/scanner/mod.rs

pub mod fetch_scanner;
pub mod tech_scanner;
pub mod whois_scanner;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use self::fetch_scanner::Fetch;
use self::tech_scanner::{classify, extract_title};
use self::whois_scanner::Resolve;
use crate::core::models::{FetchOutcome, Resolution, ScanRecord};

/// Runs fetch, classification and identity resolution across a batch of
/// domains.
///
/// At most `concurrency` fetches are in flight per host at any time. The
/// identity lookup runs concurrently with the fetch and is independent of
/// its outcome. The returned records are in input order regardless of
/// completion order, and one domain's failure is captured as data rather
/// than aborting its siblings.
pub async fn scan_batch<F, R>(
    fetcher: &F,
    resolver: &R,
    domains: &[String],
    concurrency: usize,
) -> Vec<ScanRecord>
where
    F: Fetch,
    R: Resolve,
{
    let concurrency = concurrency.max(1);
    info!(domains = domains.len(), concurrency, "Fanning out scan batch.");

    let mut limits: HashMap<&str, Arc<Semaphore>> = HashMap::new();
    for domain in domains {
        limits
            .entry(domain.as_str())
            .or_insert_with(|| Arc::new(Semaphore::new(concurrency)));
    }

    let tasks = domains.iter().map(|domain| {
        let limit = Arc::clone(&limits[domain.as_str()]);
        async move {
            let (outcome, resolution) = tokio::join!(
                async {
                    // The permit scopes the fetch only; classification runs
                    // outside the per-host bound.
                    let _permit = limit.acquire().await.expect("scan semaphore closed");
                    fetcher.fetch(domain).await
                },
                resolver.resolve(domain)
            );
            build_record(domain, outcome, resolution)
        }
    });

    futures::future::join_all(tasks).await
}

fn build_record(domain: &str, outcome: FetchOutcome, company: Resolution) -> ScanRecord {
    match outcome {
        FetchOutcome::Ok { status, final_url, body, headers } => {
            let detected = classify(&body, &headers);
            let title = extract_title(&body);
            let hosting = headers
                .get(reqwest::header::SERVER)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
            info!(domain, status, techs = detected.raw.len(), "Scan complete.");
            ScanRecord {
                domain: domain.to_string(),
                url: final_url,
                ok: true,
                status: Some(status),
                title,
                hosting,
                detected: Some(detected),
                company,
                error: None,
            }
        }
        FetchOutcome::Error { message } => {
            warn!(domain, error = %message, "Scan could not reach the server.");
            ScanRecord {
                domain: domain.to_string(),
                url: format!("https://{domain}"),
                ok: false,
                status: None,
                title: None,
                hosting: None,
                detected: None,
                company,
                error: Some(message),
            }
        }
    }
}
