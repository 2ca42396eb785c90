//! Shared types for TIPSTER.
//!
//! These types form the data model used across all modules. Picks are
//! immutable inputs supplied by a `PickSource`; everything else in the
//! crate is derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::sport::Sport;

// ---------------------------------------------------------------------------
// Pick
// ---------------------------------------------------------------------------

/// A single recorded wager on a subject/stat-type market, with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Player (or team) the pick is on.
    #[serde(alias = "player_name")]
    pub subject: String,
    /// Stat label, e.g. "points", "rebounds", "passing yards".
    pub stat_type: String,
    pub line: f64,
    #[serde(alias = "over_under")]
    pub side: Side,
    /// American odds (e.g. -110, +150). Zero is not a valid price.
    pub odds: i32,
    #[serde(alias = "result")]
    pub outcome: Outcome,
    /// Realized stat value the market settled on.
    #[serde(default)]
    pub actual_value: f64,
    /// Analyst confidence, 0–100, read as a probability estimate.
    pub confidence: f64,
    #[serde(alias = "created_at")]
    pub timestamp: DateTime<Utc>,
    /// Free-text category label; the sport is derived from it.
    #[serde(default)]
    pub category: String,
    #[serde(alias = "user_id")]
    pub owner: String,
    #[serde(default)]
    pub stake: f64,
    #[serde(default)]
    pub profit_loss: f64,
}

impl fmt::Display for PickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({:+}) -> {} [{}]",
            self.subject,
            self.stat_type,
            self.side,
            self.line,
            self.odds,
            self.outcome,
            self.timestamp.format("%Y-%m-%d"),
        )
    }
}

impl PickRecord {
    /// Key used to group picks for per-entity analysis.
    pub fn group_key(&self) -> String {
        format!("{}|{}", self.subject, self.stat_type)
    }

    /// Analyst confidence as a probability. Not clamped.
    pub fn true_probability(&self) -> f64 {
        self.confidence / 100.0
    }

    /// Sport derived from the free-text category label.
    pub fn sport(&self) -> Sport {
        Sport::from_label(&self.category)
    }

    /// Calendar day of the pick (UTC).
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Helper to build a test pick with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        PickRecord {
            id: None,
            subject: "LeBron James".to_string(),
            stat_type: "points".to_string(),
            line: 25.5,
            side: Side::Over,
            odds: -110,
            outcome: Outcome::Win,
            actual_value: 28.0,
            confidence: 60.0,
            timestamp: Utc::now(),
            category: "NBA Props".to_string(),
            owner: "user-1".to_string(),
            stake: 100.0,
            profit_loss: 90.91,
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side of the line the pick took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Over,
    Under,
}

impl Side {
    /// +1 for over, -1 for under. Used to sign performance deltas.
    pub fn sign(&self) -> f64 {
        match self {
            Side::Over => 1.0,
            Side::Under => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => write!(f, "over"),
            Side::Under => write!(f, "under"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "over" | "o" => Ok(Side::Over),
            "under" | "u" => Ok(Side::Under),
            _ => Err(anyhow::anyhow!("Unknown side: {s}")),
        }
    }
}

/// Settled result of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

impl Outcome {
    /// Win or loss; pushes never count toward ratios.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Push)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::Push => write!(f, "push"),
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win" | "won" | "w" => Ok(Outcome::Win),
            "loss" | "lost" | "l" => Ok(Outcome::Loss),
            "push" | "p" => Ok(Outcome::Push),
            _ => Err(anyhow::anyhow!("Unknown outcome: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Query window
// ---------------------------------------------------------------------------

/// Filters handed to a `PickSource`. The engine never re-validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickQuery {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub owner: Option<String>,
    pub sport_filter: Option<String>,
}

impl PickQuery {
    /// Window covering the last `days_back` days up to `now`.
    pub fn last_days(days_back: i64, now: DateTime<Utc>) -> Self {
        Self {
            since: now - chrono::Duration::days(days_back),
            until: now,
            owner: None,
            sport_filter: None,
        }
    }

    pub fn with_owner(mut self, owner: Option<&str>) -> Self {
        self.owner = owner.map(str::to_string);
        self
    }

    pub fn with_sport(mut self, sport: Option<&str>) -> Self {
        self.sport_filter = sport.map(str::to_string);
        self
    }

    /// Whether a pick falls inside this query. Used by sources that cannot
    /// push filters down to storage.
    pub fn matches(&self, pick: &PickRecord) -> bool {
        if pick.timestamp < self.since || pick.timestamp > self.until {
            return false;
        }
        if let Some(owner) = &self.owner {
            if &pick.owner != owner {
                return false;
            }
        }
        if let Some(filter) = &self.sport_filter {
            let wanted = filter.to_lowercase();
            let label_hit = pick.category.to_lowercase().contains(&wanted);
            let sport_hit = pick.sport().to_string().to_lowercase() == wanted;
            if !label_hit && !sport_hit {
                return false;
            }
        }
        true
    }
}

/// Inclusive timestamp span of the picks an analysis covered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Span of the given picks, or `None` when there are none.
    pub fn of(picks: &[PickRecord]) -> Option<Self> {
        let start = picks.iter().map(|p| p.timestamp).min()?;
        let end = picks.iter().map(|p| p.timestamp).max()?;
        Some(Self { start, end })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for TIPSTER.
#[derive(Debug, thiserror::Error)]
pub enum TipsterError {
    #[error("Invalid American odds: {0} (odds must be non-zero)")]
    InvalidOdds(i32),

    #[error("Pick source error ({source_name}): {message}")]
    Source { source_name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
