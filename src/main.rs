// src/main.rs

use std::fs;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{error, info, warn};

use stackprobe_rs::config::Config;
use stackprobe_rs::core::domain;
use stackprobe_rs::core::scanner;
use stackprobe_rs::core::scanner::fetch_scanner::HttpFetcher;
use stackprobe_rs::core::scanner::whois_scanner::WhoisResolver;
use stackprobe_rs::db::Store;
use stackprobe_rs::logging;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let config = Config::from_env();
    let raw = fs::read_to_string(&config.domains_file)
        .wrap_err_with(|| format!("failed to read domains file {:?}", config.domains_file))?;

    // Invalid lines are rejected before any I/O and skipped; they never
    // reach the fetcher.
    let mut domains = Vec::new();
    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match domain::normalize(line) {
            Ok(normalized) => domains.push(normalized),
            Err(e) => warn!(input = line, error = %e, "Skipping invalid domain."),
        }
    }
    if domains.is_empty() {
        info!(file = %config.domains_file, "No valid domains to scan.");
        return Ok(());
    }

    let fetcher = HttpFetcher::new().wrap_err("failed to build HTTP client")?;
    let resolver =
        WhoisResolver::new().map_err(|e| eyre!("failed to build WHOIS client: {e:?}"))?;
    let store = Store::connect(&config.database_url)
        .await
        .wrap_err("failed to connect to database")?;
    store.migrate().await.wrap_err("failed to prepare schema")?;

    info!(count = domains.len(), concurrency = config.concurrency, "Starting batch scan.");
    let records = scanner::scan_batch(&fetcher, &resolver, &domains, config.concurrency).await;

    // Each domain's writes are their own atomic unit; a persistence failure
    // is logged as a failed domain and the batch continues.
    let mut persistence_failures = 0usize;
    for record in &records {
        match store.record_scan(record).await {
            Ok(website_id) => {
                info!(domain = %record.domain, website_id, ok = record.ok, "Recorded scan.");
            }
            Err(e) => {
                persistence_failures += 1;
                error!(domain = %record.domain, error = %e, "Failed to persist scan.");
            }
        }
        tokio::time::sleep(config.inter_scan_delay).await;
    }

    info!(
        scanned = records.len(),
        persistence_failures,
        "Batch scan complete."
    );
    Ok(())
}
