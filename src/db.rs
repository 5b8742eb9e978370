// src/db.rs

//! Persistence gateway over PostgreSQL.
//!
//! One scan event is two writes in one transaction: an idempotent upsert of
//! the website's current state keyed by domain, and an append-only insert of
//! the detection history row. Detection history is never pruned here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::core::models::{Bucket, ScanRecord};

const MAX_CONNECTIONS: u32 = 10;

const CREATE_WEBSITES: &str = "
CREATE TABLE IF NOT EXISTS websites (
    id BIGSERIAL PRIMARY KEY,
    domain TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL,
    last_scanned TIMESTAMPTZ,
    status TEXT NOT NULL,
    http_status INTEGER,
    title TEXT,
    company_name TEXT,
    hosting TEXT
)";

const CREATE_DETECTIONS: &str = "
CREATE TABLE IF NOT EXISTS detections (
    id BIGSERIAL PRIMARY KEY,
    website_id BIGINT NOT NULL REFERENCES websites(id),
    detected_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    cms TEXT[] NOT NULL DEFAULT '{}',
    js_libs TEXT[] NOT NULL DEFAULT '{}',
    analytics TEXT[] NOT NULL DEFAULT '{}',
    custom_tags TEXT[] NOT NULL DEFAULT '{}',
    raw JSONB NOT NULL DEFAULT '{}'::jsonb
)";

const UPSERT_WEBSITE: &str = "
INSERT INTO websites (domain, url, last_scanned, status, http_status, title, company_name, hosting)
VALUES ($1, $2, now(), $3, $4, $5, $6, $7)
ON CONFLICT (domain) DO UPDATE SET
    url = EXCLUDED.url,
    last_scanned = now(),
    status = EXCLUDED.status,
    http_status = EXCLUDED.http_status,
    title = EXCLUDED.title,
    company_name = EXCLUDED.company_name,
    hosting = EXCLUDED.hosting
RETURNING id";

const INSERT_DETECTION: &str = "
INSERT INTO detections (website_id, detected_at, cms, js_libs, analytics, custom_tags, raw)
VALUES ($1, now(), $2, $3, $4, $5, $6)";

/// Latest detection for one website, joined with current website state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DetectionRecord {
    pub domain: String,
    pub url: String,
    pub last_scanned: Option<DateTime<Utc>>,
    pub status: String,
    pub detected_at: DateTime<Utc>,
    pub cms: Vec<String>,
    pub js_libs: Vec<String>,
    pub analytics: Vec<String>,
    pub custom_tags: Vec<String>,
    pub raw: serde_json::Value,
}

/// One row of the paged directory listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebsiteSummary {
    pub domain: String,
    pub url: String,
    pub last_scanned: Option<DateTime<Utc>>,
    pub cms: Vec<String>,
    pub js_libs: Vec<String>,
    pub analytics: Vec<String>,
    pub custom_tags: Vec<String>,
}

/// A (technology name, occurrence count) aggregation pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TechCount {
    pub name: String,
    pub count: i64,
}

pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connects a bounded pool to the given database URL.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        info!("Connected to database.");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `websites` and `detections` tables when absent.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_WEBSITES).execute(&self.pool).await?;
        sqlx::query(CREATE_DETECTIONS).execute(&self.pool).await?;
        debug!("Schema is up to date.");
        Ok(())
    }

    /// Persists one scan event: upserts the website row and appends one
    /// detection row referencing it, in a single transaction. If the upsert
    /// fails no detection row is written. Returns the stable website id.
    pub async fn record_scan(&self, record: &ScanRecord) -> Result<i64, sqlx::Error> {
        let detected = record.detected.clone().unwrap_or_default();

        let mut tx = self.pool.begin().await?;
        let website_id: i64 = sqlx::query_scalar(UPSERT_WEBSITE)
            .bind(&record.domain)
            .bind(&record.url)
            .bind(record.status_label())
            .bind(record.status.map(i32::from))
            .bind(&record.title)
            .bind(record.company.company())
            .bind(&record.hosting)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(INSERT_DETECTION)
            .bind(website_id)
            .bind(&detected.cms)
            .bind(&detected.js_libs)
            .bind(&detected.analytics)
            .bind(&detected.custom_tags)
            .bind(record.raw_evidence())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(domain = %record.domain, website_id, "Recorded scan event.");
        Ok(website_id)
    }

    /// The most recent detection for a domain joined with website state, or
    /// `None` when the domain has never been scanned.
    pub async fn latest(&self, domain: &str) -> Result<Option<DetectionRecord>, sqlx::Error> {
        sqlx::query_as(
            "SELECT w.domain, w.url, w.last_scanned, w.status,
                    d.detected_at, d.cms, d.js_libs, d.analytics, d.custom_tags, d.raw
             FROM websites w
             JOIN detections d ON d.website_id = w.id
             WHERE w.domain = $1
             ORDER BY d.detected_at DESC
             LIMIT 1",
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
    }

    /// Paged website directory with each site's latest detection. Filters
    /// require the stored sets to be supersets of the requested sets.
    pub async fn list(
        &self,
        page: u32,
        per_page: u32,
        filter_js_libs: Option<&[String]>,
        filter_cms: Option<&[String]>,
    ) -> Result<Vec<WebsiteSummary>, sqlx::Error> {
        sqlx::query_as(
            "SELECT w.domain, w.url, w.last_scanned,
                    d.cms, d.js_libs, d.analytics, d.custom_tags
             FROM websites w
             JOIN LATERAL (
                 SELECT cms, js_libs, analytics, custom_tags
                 FROM detections
                 WHERE website_id = w.id
                 ORDER BY detected_at DESC
                 LIMIT 1
             ) d ON true
             WHERE ($1::text[] IS NULL OR d.js_libs @> $1)
               AND ($2::text[] IS NULL OR d.cms @> $2)
             ORDER BY w.last_scanned DESC NULLS LAST
             LIMIT $3 OFFSET $4",
        )
        .bind(filter_js_libs)
        .bind(filter_cms)
        .bind(i64::from(per_page))
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await
    }

    /// Top-10 (name, count) pairs for one bucket across all stored
    /// detections. The column name comes from the `Bucket` enum, never from
    /// caller input.
    pub async fn aggregate_counts(&self, bucket: Bucket) -> Result<Vec<TechCount>, sqlx::Error> {
        let sql = format!(
            "SELECT t.name, COUNT(*) AS count
             FROM detections d, unnest(d.{}) AS t(name)
             GROUP BY t.name
             ORDER BY count DESC, t.name ASC
             LIMIT 10",
            bucket.column()
        );
        sqlx::query_as(&sql).fetch_all(&self.pool).await
    }
}

/// Offset for 1-based page numbers; page 0 is treated as page 1.
fn page_offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_one_based() {
        assert_eq!(page_offset(1, 50), 0);
        assert_eq!(page_offset(2, 50), 50);
        assert_eq!(page_offset(3, 25), 50);
        assert_eq!(page_offset(0, 50), 0);
    }
}
