//! Pattern analysis: streaks, trend breaks, line outliers and
//! regression-to-mean candidates over grouped picks.

pub mod grouping;
pub mod outliers;
pub mod regression;
pub mod stats;
pub mod streaks;
pub mod trend_breaks;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::types::{DateRange, PickRecord};
use grouping::group_picks;
use outliers::{OutlierConfig, OutlierDetector, StatisticalOutlier};
use regression::{RegressionAnalyzer, RegressionCandidate, RegressionConfig};
use streaks::{StreakAnalysis, StreakAnalyzer, StreakConfig};
use trend_breaks::{TrendBreak, TrendBreakConfig, TrendBreakDetector};

/// A detector output carrying a confidence in [0, 1].
pub trait Scored {
    fn confidence(&self) -> f64;
}

/// Keep only items at or above `threshold`, preserving order.
pub fn retain_confident<T: Scored>(items: Vec<T>, threshold: f64) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.confidence() >= threshold)
        .collect()
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for each detector. Defaults are the production constants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub streaks: StreakConfig,
    pub trend_breaks: TrendBreakConfig,
    pub outliers: OutlierConfig,
    pub regression: RegressionConfig,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub total_picks_analyzed: usize,
    pub groups_analyzed: usize,
    /// Span of the analyzed picks; `None` when there were none.
    pub date_range: Option<DateRange>,
    pub days_back: i64,
    pub min_sample_size: usize,
    pub confidence_threshold: f64,
    pub sport_filter: Option<String>,
}

/// Combined output of every detector for one pick collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub streaks: Vec<StreakAnalysis>,
    pub trend_breaks: Vec<TrendBreak>,
    pub outliers: Vec<StatisticalOutlier>,
    pub regression_candidates: Vec<RegressionCandidate>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisSummary {
    /// Well-formed summary with no findings, e.g. after a failed fetch.
    pub fn empty(config: &AnalysisConfig) -> Self {
        Self {
            streaks: Vec::new(),
            trend_breaks: Vec::new(),
            outliers: Vec::new(),
            regression_candidates: Vec::new(),
            metadata: AnalysisMetadata {
                total_picks_analyzed: 0,
                groups_analyzed: 0,
                date_range: None,
                days_back: config.days_back,
                min_sample_size: config.min_sample_size,
                confidence_threshold: config.confidence_threshold,
                sport_filter: config.sport_filter.clone(),
            },
        }
    }

    /// Total findings across all detectors.
    pub fn total_signals(&self) -> usize {
        self.streaks.len()
            + self.trend_breaks.len()
            + self.outliers.len()
            + self.regression_candidates.len()
    }
}

impl fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self
            .metadata
            .date_range
            .map(|r| r.to_string())
            .unwrap_or_else(|| "no picks".to_string());
        write!(
            f,
            "{} picks ({}) | streaks={} trend_breaks={} outliers={} regression={} | threshold={:.2}",
            self.metadata.total_picks_analyzed,
            range,
            self.streaks.len(),
            self.trend_breaks.len(),
            self.outliers.len(),
            self.regression_candidates.len(),
            self.metadata.confidence_threshold,
        )
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Runs grouping once, then every detector over the same groups, then the
/// confidence filter.
pub struct PatternAnalyzer {
    streaks: StreakAnalyzer,
    trend_breaks: TrendBreakDetector,
    outliers: OutlierDetector,
    regression: RegressionAnalyzer,
}

impl PatternAnalyzer {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            streaks: StreakAnalyzer::new(config.streaks),
            trend_breaks: TrendBreakDetector::new(config.trend_breaks),
            outliers: OutlierDetector::new(config.outliers),
            regression: RegressionAnalyzer::new(config.regression),
        }
    }

    /// Analyze a pick collection. Pure: the same picks and config always
    /// give the same summary.
    pub fn analyze(&self, picks: &[PickRecord], config: &AnalysisConfig) -> AnalysisSummary {
        if picks.is_empty() {
            debug!("No picks to analyze");
            return AnalysisSummary::empty(config);
        }

        let groups = group_picks(picks);
        let min = config.min_sample_size;
        let threshold = config.confidence_threshold;

        let streaks = retain_confident(self.streaks.analyze(&groups, min), threshold);
        let trend_breaks = retain_confident(self.trend_breaks.detect(&groups, min), threshold);
        let outliers = retain_confident(self.outliers.detect(&groups, min), threshold);
        let regression_candidates =
            retain_confident(self.regression.analyze(&groups, min), threshold);

        info!(
            picks = picks.len(),
            groups = groups.len(),
            streaks = streaks.len(),
            trend_breaks = trend_breaks.len(),
            outliers = outliers.len(),
            regression = regression_candidates.len(),
            threshold,
            "Pattern analysis complete"
        );

        AnalysisSummary {
            streaks,
            trend_breaks,
            outliers,
            regression_candidates,
            metadata: AnalysisMetadata {
                total_picks_analyzed: picks.len(),
                groups_analyzed: groups.len(),
                date_range: DateRange::of(picks),
                days_back: config.days_back,
                min_sample_size: min,
                confidence_threshold: threshold,
                sport_filter: config.sport_filter.clone(),
            },
        }
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

/// Convenience wrapper over `PatternAnalyzer` with default detectors.
pub fn analyze_picks(picks: &[PickRecord], config: &AnalysisConfig) -> AnalysisSummary {
    PatternAnalyzer::default().analyze(picks, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
