//! Statistical line outliers.
//!
//! Compares the most recent line posted for a subject/stat-type against
//! the distribution of all lines in the group.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::grouping::{recent_first, PickGroups};
use super::stats::{mean, population_std_dev, STD_DEV_EPSILON};
use super::Scored;
use crate::types::PickRecord;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub min_z_score: f64,
    /// confidence = min(max_confidence, z / z_scale)
    pub z_scale: f64,
    pub max_confidence: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            min_z_score: 2.0,
            z_scale: 4.0,
            max_confidence: 0.95,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierType {
    High,
    Low,
}

impl fmt::Display for OutlierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierType::High => write!(f, "high"),
            OutlierType::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalOutlier {
    pub subject: String,
    pub stat_type: String,
    pub current_line: f64,
    pub historical_mean: f64,
    pub std_dev: f64,
    pub z_score: f64,
    pub outlier_type: OutlierType,
    pub confidence: f64,
    pub sample_size: usize,
}

impl fmt::Display for StatisticalOutlier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: line {} vs mean {:.1} (σ {:.2}, z {:.2}, {})",
            self.subject,
            self.stat_type,
            self.current_line,
            self.historical_mean,
            self.std_dev,
            self.z_score,
            self.outlier_type,
        )
    }
}

impl Scored for StatisticalOutlier {
    fn confidence(&self) -> f64 {
        self.confidence
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

pub struct OutlierDetector {
    config: OutlierConfig,
}

impl OutlierDetector {
    pub fn new(config: OutlierConfig) -> Self {
        Self { config }
    }

    /// Line outliers for every eligible group, sorted by z-score descending.
    pub fn detect(&self, groups: &PickGroups<'_>, min_sample_size: usize) -> Vec<StatisticalOutlier> {
        let mut outliers: Vec<StatisticalOutlier> = groups
            .values()
            .filter(|g| g.len() >= min_sample_size)
            .filter_map(|g| self.detect_group(g))
            .collect();

        outliers.sort_by(|a, b| {
            b.z_score
                .partial_cmp(&a.z_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        outliers
    }

    fn detect_group(&self, group: &[&PickRecord]) -> Option<StatisticalOutlier> {
        let sorted = recent_first(group);
        let latest = sorted.first()?;

        let lines: Vec<f64> = sorted.iter().map(|p| p.line).collect();
        let historical_mean = mean(&lines)?;
        let std_dev = population_std_dev(&lines, historical_mean);
        if std_dev < STD_DEV_EPSILON {
            debug!(
                subject = %latest.subject,
                stat_type = %latest.stat_type,
                "No line variance, skipping outlier check"
            );
            return None;
        }

        let current_line = latest.line;
        let z_score = (current_line - historical_mean).abs() / std_dev;
        if z_score < self.config.min_z_score {
            return None;
        }

        let outlier_type = if current_line > historical_mean {
            OutlierType::High
        } else {
            OutlierType::Low
        };
        let confidence = (z_score / self.config.z_scale).min(self.config.max_confidence);

        debug!(
            subject = %latest.subject,
            stat_type = %latest.stat_type,
            current_line,
            mean = format!("{:.2}", historical_mean),
            z = format!("{:.2}", z_score),
            kind = %outlier_type,
            "Line outlier detected"
        );

        Some(StatisticalOutlier {
            subject: latest.subject.clone(),
            stat_type: latest.stat_type.clone(),
            current_line,
            historical_mean,
            std_dev,
            z_score,
            outlier_type,
            confidence,
            sample_size: sorted.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
