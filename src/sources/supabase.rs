//! Supabase pick source.
//!
//! Reads settled picks from the store's PostgREST endpoint
//! (`/rest/v1/<table>`). Filters are pushed down as query parameters and
//! results are paged with `limit`/`offset` until a short page comes back.
//! The server-side sport and result filters over-fetch; rows are parsed
//! and re-checked with `PickQuery::matches` locally, so this source
//! returns the same picks as the JSON file source.
//!
//! Auth: the service key is sent as both the `apikey` header and a
//! bearer token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::PickSource;
use crate::sport::Sport;
use crate::types::{Outcome, PickQuery, PickRecord, Side, TipsterError};

const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Odds assumed when a row has none recorded (standard -110 juice).
const DEFAULT_ODDS: i32 = -110;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row of the picks table as PostgREST returns it.
#[derive(Debug, Deserialize)]
struct PickRow {
    #[serde(default)]
    id: Option<Uuid>,
    player_name: String,
    stat_type: String,
    line: f64,
    over_under: String,
    #[serde(default)]
    odds: Option<i32>,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    actual_value: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    category: Option<String>,
    user_id: String,
    #[serde(default)]
    stake: Option<f64>,
    #[serde(default)]
    profit_loss: Option<f64>,
}

impl PickRow {
    /// Convert to a `PickRecord`. Rows with an unreadable side or outcome
    /// (e.g. still pending) are dropped.
    fn into_pick(self) -> Option<PickRecord> {
        let side: Side = self.over_under.parse().ok()?;
        let outcome: Outcome = self.result.as_deref()?.parse().ok()?;

        Some(PickRecord {
            id: self.id,
            subject: self.player_name,
            stat_type: self.stat_type,
            line: self.line,
            side,
            odds: self.odds.unwrap_or(DEFAULT_ODDS),
            outcome,
            actual_value: self.actual_value.unwrap_or(0.0),
            confidence: self.confidence.unwrap_or(50.0),
            timestamp: self.created_at,
            category: self.category.unwrap_or_default(),
            owner: self.user_id,
            stake: self.stake.unwrap_or(0.0),
            profit_loss: self.profit_loss.unwrap_or(0.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Sport filter
// ---------------------------------------------------------------------------

/// `ilike` clauses for a sport filter: the raw text, plus every label
/// keyword when the filter names a sport. The server result is a superset
/// of `PickQuery::matches`, which trims it after conversion.
fn category_clauses(filter: &str) -> String {
    let mut patterns = vec![filter.trim().to_lowercase()];
    if let Some(sport) = Sport::from_name(filter) {
        for kw in sport.keywords() {
            if !patterns.iter().any(|p| p == kw) {
                patterns.push(kw.to_string());
            }
        }
    }
    patterns
        .iter()
        .map(|p| format!("category.ilike.*{}*", urlencoding::encode(p)))
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct SupabaseSource {
    http: Client,
    base_url: String,
    table: String,
    api_key: SecretString,
    page_size: u32,
}

impl SupabaseSource {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: SecretString,
        page_size: Option<u32>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("TIPSTER/0.1.0 (pick-analytics)")
            .build()
            .context("Failed to build HTTP client for Supabase")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            api_key,
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        })
    }

    /// PostgREST URL for one page of the query.
    fn page_url(&self, query: &PickQuery, offset: usize) -> String {
        let ts = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut url = format!(
            "{}/rest/v1/{}?select=*&created_at=gte.{}&created_at=lte.{}&result=not.is.null",
            self.base_url,
            self.table,
            urlencoding::encode(&ts(query.since)),
            urlencoding::encode(&ts(query.until)),
        );
        if let Some(owner) = &query.owner {
            url.push_str(&format!("&user_id=eq.{}", urlencoding::encode(owner)));
        }
        if let Some(sport) = &query.sport_filter {
            url.push_str(&format!("&or=({})", category_clauses(sport)));
        }
        // `id` breaks timestamp ties so offset paging never skips or repeats rows.
        url.push_str(&format!(
            "&order=created_at.desc,id.desc&limit={}&offset={}",
            self.page_size, offset
        ));
        url
    }

    async fn fetch_page(&self, url: &str) -> Result<Vec<PickRow>> {
        debug!(url = %url, "Fetching Supabase picks page");

        let key = self.api_key.expose_secret();
        let resp = self
            .http
            .get(url)
            .header("apikey", key.as_str())
            .header("Authorization", format!("Bearer {key}"))
            .send()
            .await
            .context("Supabase request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TipsterError::Source {
                source_name: "supabase".into(),
                message: format!("{status}: {body}"),
            }
            .into());
        }

        let rows: Vec<PickRow> = resp
            .json()
            .await
            .context("Failed to parse Supabase picks response")?;
        Ok(rows)
    }
}

#[async_trait]
impl PickSource for SupabaseSource {
    async fn fetch_picks(&self, query: &PickQuery) -> Result<Vec<PickRecord>> {
        let mut picks = Vec::new();
        let mut dropped = 0usize;
        let mut filtered = 0usize;
        let mut offset = 0usize;

        loop {
            let rows = self.fetch_page(&self.page_url(query, offset)).await?;
            let page_len = rows.len();

            for row in rows {
                match row.into_pick() {
                    Some(pick) if query.matches(&pick) => picks.push(pick),
                    Some(_) => filtered += 1,
                    None => dropped += 1,
                }
            }

            if page_len < self.page_size as usize {
                break;
            }
            offset += page_len;
        }

        info!(
            table = %self.table,
            fetched = picks.len(),
            dropped,
            filtered,
            "Supabase picks loaded"
        );

        Ok(picks)
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
