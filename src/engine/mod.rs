//! Analysis engine: fetch picks once, then run the pattern detectors or
//! the EV report over them.
//!
//! The source is injected so the engine never reaches for global state.
//! A failed fetch degrades to an empty result; callers always receive a
//! well-formed summary.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::analysis::{AnalysisSummary, DetectorConfig, PatternAnalyzer};
use crate::config::AnalysisConfig;
use crate::ev::{self, EvSummary};
use crate::sources::PickSource;
use crate::types::{PickQuery, PickRecord};

pub struct AnalysisEngine {
    source: Box<dyn PickSource>,
    config: AnalysisConfig,
    analyzer: PatternAnalyzer,
}

impl AnalysisEngine {
    pub fn new(source: Box<dyn PickSource>, config: AnalysisConfig, detectors: DetectorConfig) -> Self {
        Self {
            source,
            config,
            analyzer: PatternAnalyzer::new(detectors),
        }
    }

    /// Query covering the configured lookback window ending at `now`.
    pub fn query(&self, owner: Option<&str>, now: DateTime<Utc>) -> PickQuery {
        PickQuery::last_days(self.config.days_back, now)
            .with_owner(owner)
            .with_sport(self.config.sport_filter.as_deref())
    }

    /// Run every pattern detector over the last `days_back` days of picks.
    pub async fn analyze_patterns(&self, owner: Option<&str>) -> AnalysisSummary {
        self.analyze_patterns_at(owner, Utc::now()).await
    }

    pub async fn analyze_patterns_at(&self, owner: Option<&str>, now: DateTime<Utc>) -> AnalysisSummary {
        let query = self.query(owner, now);
        match self.fetch(&query).await {
            Some(picks) => self.analyzer.analyze(&picks, &self.config),
            None => AnalysisSummary::empty(&self.config),
        }
    }

    /// EV report over the last `days_back` days of picks.
    pub async fn ev_report(&self, owner: Option<&str>) -> EvSummary {
        self.ev_report_at(owner, Utc::now()).await
    }

    pub async fn ev_report_at(&self, owner: Option<&str>, now: DateTime<Utc>) -> EvSummary {
        let query = self.query(owner, now);
        match self.fetch(&query).await {
            Some(picks) => ev::build_report(&picks),
            None => EvSummary::default(),
        }
    }

    /// Fetch picks, logging and swallowing source failures.
    async fn fetch(&self, query: &PickQuery) -> Option<Vec<PickRecord>> {
        match self.source.fetch_picks(query).await {
            Ok(picks) => {
                info!(
                    source = self.source.name(),
                    picks = picks.len(),
                    since = %query.since,
                    owner = ?query.owner,
                    sport = ?query.sport_filter,
                    "Picks fetched"
                );
                Some(picks)
            }
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "Pick fetch failed, returning empty result"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
