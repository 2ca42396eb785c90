//! Regression-to-mean candidates.
//!
//! Performance is measured per pick as the signed margin by which the
//! realized stat beat the line on the picked side. Groups whose recent
//! average margin sits far from their historical average are flagged as
//! likely to revert.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::grouping::{recent_first, PickGroups};
use super::stats::mean;
use super::Scored;
use crate::types::PickRecord;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Cap on the recent window size.
    pub max_recent: usize,
    /// Share of the group that forms the recent window.
    pub recent_fraction: f64,
    /// Minimum |avg_recent - avg_historical| to report.
    pub min_delta: f64,
    /// Band around the historical average that ends a run.
    pub streak_margin: f64,
    /// confidence = min(max_confidence, |delta| / confidence_scale)
    pub confidence_scale: f64,
    pub max_confidence: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            max_recent: 5,
            recent_fraction: 0.3,
            min_delta: 1.5,
            streak_margin: 0.5,
            confidence_scale: 5.0,
            max_confidence: 0.9,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Which way the group is expected to move back toward its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionDirection {
    /// Running hot; expected to come back down.
    Downward,
    /// Running cold; expected to recover.
    Upward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionCandidate {
    pub subject: String,
    pub stat_type: String,
    /// Mean performance over the recent window.
    pub current_performance: f64,
    /// Mean performance over the history: the regression target.
    pub expected_performance: f64,
    /// current - expected
    pub performance_delta: f64,
    pub direction: RegressionDirection,
    pub regression_confidence: f64,
    pub over_performance_streak: usize,
    pub under_performance_streak: usize,
    pub recent_count: usize,
    pub historical_count: usize,
    pub sample_size: usize,
}

impl fmt::Display for RegressionCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: recent {:+.2} vs baseline {:+.2} (Δ {:+.2}, conf {:.0}%)",
            self.subject,
            self.stat_type,
            self.current_performance,
            self.expected_performance,
            self.performance_delta,
            self.regression_confidence * 100.0,
        )
    }
}

impl Scored for RegressionCandidate {
    fn confidence(&self) -> f64 {
        self.regression_confidence
    }
}

/// Signed margin of the realized value over the line, from the picked side.
pub fn performance(pick: &PickRecord) -> f64 {
    let target = pick.side.sign() * pick.line;
    let actual = pick.side.sign() * pick.actual_value;
    actual - target
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub struct RegressionAnalyzer {
    config: RegressionConfig,
}

impl RegressionAnalyzer {
    pub fn new(config: RegressionConfig) -> Self {
        Self { config }
    }

    /// Regression candidates for every eligible group, sorted by
    /// confidence descending.
    pub fn analyze(&self, groups: &PickGroups<'_>, min_sample_size: usize) -> Vec<RegressionCandidate> {
        let mut candidates: Vec<RegressionCandidate> = groups
            .values()
            .filter(|g| g.len() >= min_sample_size)
            .filter_map(|g| self.analyze_group(g))
            .collect();

        candidates.sort_by(|a, b| {
            b.regression_confidence
                .partial_cmp(&a.regression_confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }

    fn analyze_group(&self, group: &[&PickRecord]) -> Option<RegressionCandidate> {
        let sorted = recent_first(group);
        let latest = sorted.first()?;
        let n = sorted.len();

        let recent_len = ((n as f64 * self.config.recent_fraction).floor() as usize)
            .min(self.config.max_recent)
            .min(n);
        if recent_len == 0 {
            return None;
        }

        let perf: Vec<f64> = sorted.iter().map(|p| performance(p)).collect();
        let (recent, historical) = perf.split_at(recent_len);

        let avg_recent = mean(recent)?;
        let avg_historical = mean(historical).unwrap_or(0.0);
        let delta = avg_recent - avg_historical;
        if delta.abs() < self.config.min_delta {
            return None;
        }

        let (over_performance_streak, under_performance_streak) =
            leading_run(recent, avg_historical, self.config.streak_margin);
        let regression_confidence =
            (delta.abs() / self.config.confidence_scale).min(self.config.max_confidence);
        let direction = if delta > 0.0 {
            RegressionDirection::Downward
        } else {
            RegressionDirection::Upward
        };

        debug!(
            subject = %latest.subject,
            stat_type = %latest.stat_type,
            avg_recent = format!("{:.2}", avg_recent),
            avg_historical = format!("{:.2}", avg_historical),
            over = over_performance_streak,
            under = under_performance_streak,
            "Regression candidate"
        );

        Some(RegressionCandidate {
            subject: latest.subject.clone(),
            stat_type: latest.stat_type.clone(),
            current_performance: avg_recent,
            expected_performance: avg_historical,
            performance_delta: delta,
            direction,
            regression_confidence,
            over_performance_streak,
            under_performance_streak,
            recent_count: recent.len(),
            historical_count: historical.len(),
            sample_size: n,
        })
    }
}

/// Length of the leading over- or under-performance run in `recent`
/// (most recent first). The walk ends at the first value inside the
/// band or on a change of direction, so only one counter is ever set.
fn leading_run(recent: &[f64], baseline: f64, margin: f64) -> (usize, usize) {
    let (mut over, mut under) = (0, 0);
    for &p in recent {
        if p > baseline + margin && under == 0 {
            over += 1;
        } else if p < baseline - margin && over == 0 {
            under += 1;
        } else {
            break;
        }
    }
    (over, under)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
