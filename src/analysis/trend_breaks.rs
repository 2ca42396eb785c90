//! Trend break detection.
//!
//! Splits each group into a recent window and the older history and
//! flags groups whose recent hit rate has moved sharply away from the
//! historical one.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::grouping::{recent_first, PickGroups};
use super::stats::{mode, OutcomeTally};
use super::Scored;
use crate::types::{PickRecord, Side};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendBreakConfig {
    /// Share of the group that forms the recent window.
    pub recent_fraction: f64,
    /// Floor on the recent window size.
    pub min_recent: usize,
    /// Minimum relative change in hit rate, in percent.
    pub min_deviation_pct: f64,
}

impl Default for TrendBreakConfig {
    fn default() -> Self {
        Self {
            recent_fraction: 0.25,
            min_recent: 3,
            min_deviation_pct: 25.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBreakType {
    PerformanceDecline,
    PerformanceSurge,
}

impl fmt::Display for TrendBreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendBreakType::PerformanceDecline => write!(f, "decline"),
            TrendBreakType::PerformanceSurge => write!(f, "surge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBreak {
    pub subject: String,
    pub stat_type: String,
    /// Most common line in the group.
    pub line: f64,
    /// Most common side in the group.
    pub side: Side,
    pub historical_hit_rate: f64,
    pub recent_hit_rate: f64,
    pub deviation_percentage: f64,
    pub confidence: f64,
    pub sample_size: usize,
    pub recent_count: usize,
    pub historical_count: usize,
    pub trend_break_type: TrendBreakType,
    pub rationale: String,
}

impl fmt::Display for TrendBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}: {:.0}% → {:.0}% ({} {:.0}%, conf {:.0}%)",
            self.subject,
            self.stat_type,
            self.side,
            self.line,
            self.historical_hit_rate * 100.0,
            self.recent_hit_rate * 100.0,
            self.trend_break_type,
            self.deviation_percentage,
            self.confidence * 100.0,
        )
    }
}

impl Scored for TrendBreak {
    fn confidence(&self) -> f64 {
        self.confidence
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

pub struct TrendBreakDetector {
    config: TrendBreakConfig,
}

impl TrendBreakDetector {
    pub fn new(config: TrendBreakConfig) -> Self {
        Self { config }
    }

    /// Trend breaks for every eligible group, sorted by confidence descending.
    pub fn detect(&self, groups: &PickGroups<'_>, min_sample_size: usize) -> Vec<TrendBreak> {
        let mut breaks: Vec<TrendBreak> = groups
            .values()
            .filter(|g| g.len() >= min_sample_size)
            .filter_map(|g| self.detect_group(g, min_sample_size))
            .collect();

        breaks.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        breaks
    }

    fn detect_group(&self, group: &[&PickRecord], min_sample_size: usize) -> Option<TrendBreak> {
        let sorted = recent_first(group);
        let latest = sorted.first()?;
        let n = sorted.len();

        let recent_len = ((n as f64 * self.config.recent_fraction).floor() as usize)
            .max(self.config.min_recent)
            .min(n);
        let (recent, historical) = sorted.split_at(recent_len);

        if historical.len() < min_sample_size {
            return None;
        }

        let recent_hit_rate = OutcomeTally::from_picks(recent).win_rate()?;
        let historical_hit_rate = OutcomeTally::from_picks(historical).win_rate()?;
        if historical_hit_rate == 0.0 {
            debug!(
                subject = %latest.subject,
                stat_type = %latest.stat_type,
                "Zero historical hit rate, deviation undefined"
            );
            return None;
        }

        let deviation_percentage =
            (recent_hit_rate - historical_hit_rate).abs() / historical_hit_rate * 100.0;
        if deviation_percentage < self.config.min_deviation_pct {
            return None;
        }

        let trend_break_type = if recent_hit_rate < historical_hit_rate {
            TrendBreakType::PerformanceDecline
        } else {
            TrendBreakType::PerformanceSurge
        };

        let confidence = 0.6 * (deviation_percentage / 100.0).min(1.0)
            + 0.2 * (recent.len() as f64 / 10.0).min(1.0)
            + 0.2 * (historical.len() as f64 / 20.0).min(1.0);

        let line = mode(sorted.iter().map(|p| p.line))?;
        let side = mode(sorted.iter().map(|p| p.side))?;

        let direction = match trend_break_type {
            TrendBreakType::PerformanceDecline => "down",
            TrendBreakType::PerformanceSurge => "up",
        };
        let rationale = format!(
            "{} {} has hit {:.0}% over the last {} picks versus {:.0}% historically, {} {:.0}%.",
            latest.subject,
            latest.stat_type,
            recent_hit_rate * 100.0,
            recent.len(),
            historical_hit_rate * 100.0,
            direction,
            deviation_percentage,
        );

        debug!(
            subject = %latest.subject,
            stat_type = %latest.stat_type,
            recent = format!("{:.0}%", recent_hit_rate * 100.0),
            historical = format!("{:.0}%", historical_hit_rate * 100.0),
            deviation = format!("{:.1}%", deviation_percentage),
            kind = %trend_break_type,
            "Trend break detected"
        );

        Some(TrendBreak {
            subject: latest.subject.clone(),
            stat_type: latest.stat_type.clone(),
            line,
            side,
            historical_hit_rate,
            recent_hit_rate,
            deviation_percentage,
            confidence,
            sample_size: n,
            recent_count: recent.len(),
            historical_count: historical.len(),
            trend_break_type,
            rationale,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
