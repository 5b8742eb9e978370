// src/core/scanner/fetch_scanner.rs

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::models::FetchOutcome;

/// Fixed identifying user-agent sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; StackprobeBot/0.1)";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Seam between the orchestrator and the network. Tests inject stub
/// implementations with artificial latency or failures.
pub trait Fetch {
    fn fetch(&self, domain: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Fetches a domain's homepage over https, falling back to http once when
/// the secure transport cannot reach the server. No further retries.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, domain: &str) -> FetchOutcome {
        let mut last_error = String::new();

        for scheme in ["https", "http"] {
            let url = format!("{scheme}://{domain}");
            match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let final_url = response.url().to_string();
                    let headers = response.headers().clone();
                    match response.text().await {
                        Ok(body) => {
                            info!(domain, status, bytes = body.len(), "Fetched homepage.");
                            return FetchOutcome::Ok { status, final_url, body, headers };
                        }
                        Err(e) => {
                            warn!(domain, url = %url, error = %e, "Failed to read response body.");
                            last_error = format!("failed to read body from {url}: {e}");
                        }
                    }
                }
                Err(e) => {
                    debug!(domain, url = %url, error = %e, "Request failed.");
                    last_error = format!("request to {url} failed: {e}");
                }
            }
        }

        warn!(domain, error = %last_error, "Could not reach the server on either scheme.");
        FetchOutcome::Error { message: last_error }
    }
}
