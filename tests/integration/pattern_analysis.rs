//! Pattern analysis through `AnalysisEngine` with an in-memory source.

use tipster::analysis::outliers::OutlierType;
use tipster::analysis::regression::RegressionDirection;
use tipster::analysis::streaks::StreakType;
use tipster::analysis::trend_breaks::TrendBreakType;
use tipster::analysis::{AnalysisSummary, DetectorConfig};
use tipster::config::AnalysisConfig;
use tipster::engine::AnalysisEngine;
use tipster::types::Outcome::{self, Loss, Win};
use tipster::types::PickRecord;

use crate::mock_source::{make_pick, now, MockPickSource};

fn config_with_threshold(confidence_threshold: f64) -> AnalysisConfig {
    AnalysisConfig {
        confidence_threshold,
        ..AnalysisConfig::default()
    }
}

fn engine(source: MockPickSource, config: AnalysisConfig) -> AnalysisEngine {
    AnalysisEngine::new(Box::new(source), config, DetectorConfig::default())
}

/// One pick per day, `outcomes[0]` being the most recent.
fn history(subject: &str, stat_type: &str, outcomes: &[Outcome]) -> Vec<PickRecord> {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| make_pick(subject, stat_type, *o, i as i64))
        .collect()
}

/// Win streak, line outlier, trend break and regression scenarios side by side.
fn mixed_picks() -> Vec<PickRecord> {
    let mut picks = Vec::new();

    // 5 wins, 5 losses, 5 wins (most recent first)
    let streak: Vec<Outcome> = [[Win; 5], [Loss; 5], [Win; 5]].concat();
    picks.extend(history("Jayson Tatum", "rebounds", &streak));

    // 14 lines around 25 with the most recent at 34
    let mut lines = history("Nikola Jokic", "points", &[Win, Loss].repeat(8)[..15]);
    for (i, p) in lines.iter_mut().enumerate() {
        p.line = if i == 0 { 34.0 } else if i % 2 == 0 { 24.0 } else { 26.0 };
    }
    picks.extend(lines);

    // Historical 12/15 hits, recent 1/5
    let recent = [Win, Loss, Loss, Loss, Loss];
    let historical: Vec<Outcome> = [[Win; 12].as_slice(), [Loss; 3].as_slice()].concat();
    picks.extend(history("Anthony Edwards", "threes", &[recent.as_slice(), historical.as_slice()].concat()));

    // Recent three beat the line by 6, the rest by 0.5
    let mut hot = history("Devin Booker", "assists", &[Win; 10]);
    for (i, p) in hot.iter_mut().enumerate() {
        p.actual_value = p.line + if i < 3 { 6.0 } else { 0.5 };
    }
    picks.extend(hot);

    picks
}

async fn analyze(picks: Vec<PickRecord>, config: AnalysisConfig) -> AnalysisSummary {
    engine(MockPickSource::new(picks), config)
        .analyze_patterns_at(None, now())
        .await
}

#[tokio::test]
async fn test_streak_after_alternating_runs() {
    let summary = analyze(mixed_picks(), config_with_threshold(0.0)).await;
    let streak = summary
        .streaks
        .iter()
        .find(|s| s.subject == "Jayson Tatum")
        .expect("streak for Tatum");
    assert_eq!(streak.current_streak, 5);
    assert_eq!(streak.streak_type, StreakType::Win);
    assert_eq!(streak.sample_size, 15);
}

#[tokio::test]
async fn test_line_outlier_detected() {
    let summary = analyze(mixed_picks(), config_with_threshold(0.0)).await;
    let outlier = summary
        .outliers
        .iter()
        .find(|o| o.subject == "Nikola Jokic")
        .expect("outlier for Jokic");
    assert_eq!(outlier.current_line, 34.0);
    assert!(outlier.z_score >= 2.0);
    assert_eq!(outlier.outlier_type, OutlierType::High);
}

#[tokio::test]
async fn test_trend_break_decline() {
    let summary = analyze(mixed_picks(), config_with_threshold(0.0)).await;
    let tb = summary
        .trend_breaks
        .iter()
        .find(|t| t.subject == "Anthony Edwards")
        .expect("trend break for Edwards");
    assert_eq!(tb.trend_break_type, TrendBreakType::PerformanceDecline);
    assert!((tb.historical_hit_rate - 0.8).abs() < 1e-9);
    assert!((tb.recent_hit_rate - 0.2).abs() < 1e-9);
    assert!(tb.deviation_percentage >= 25.0);
    assert_eq!(tb.recent_count, 5);
    assert_eq!(tb.historical_count, 15);
}

#[tokio::test]
async fn test_regression_candidate_downward() {
    let summary = analyze(mixed_picks(), config_with_threshold(0.0)).await;
    let rc = summary
        .regression_candidates
        .iter()
        .find(|r| r.subject == "Devin Booker")
        .expect("regression candidate for Booker");
    assert_eq!(rc.direction, RegressionDirection::Downward);
    assert!((rc.performance_delta - 5.5).abs() < 1e-9);
    assert_eq!(rc.over_performance_streak, 3);
    assert_eq!(rc.under_performance_streak, 0);
}

#[tokio::test]
async fn test_raising_threshold_never_adds_findings() {
    let mut previous: Option<AnalysisSummary> = None;
    for threshold in [0.0, 0.2, 0.4, 0.6, 0.7, 0.8, 0.9, 1.0] {
        let summary = analyze(mixed_picks(), config_with_threshold(threshold)).await;
        for s in &summary.streaks {
            assert!(s.confidence_score >= threshold);
        }
        if let Some(prev) = &previous {
            assert!(summary.streaks.len() <= prev.streaks.len());
            assert!(summary.trend_breaks.len() <= prev.trend_breaks.len());
            assert!(summary.outliers.len() <= prev.outliers.len());
            assert!(summary.regression_candidates.len() <= prev.regression_candidates.len());
        }
        previous = Some(summary);
    }
}

#[tokio::test]
async fn test_empty_source_gives_empty_summary() {
    let summary = analyze(Vec::new(), AnalysisConfig::default()).await;
    assert_eq!(summary.metadata.total_picks_analyzed, 0);
    assert_eq!(summary.total_signals(), 0);
    assert!(summary.metadata.date_range.is_none());
}

#[tokio::test]
async fn test_fetch_failure_then_recovery() {
    let source = MockPickSource::new(mixed_picks());
    let handle = source.clone();
    let engine = engine(source, config_with_threshold(0.0));

    handle.set_error("connection reset");
    let degraded = engine.analyze_patterns_at(None, now()).await;
    assert_eq!(degraded.metadata.total_picks_analyzed, 0);
    assert_eq!(degraded.total_signals(), 0);
    assert_eq!(degraded.metadata.confidence_threshold, 0.0);

    handle.clear_error();
    let recovered = engine.analyze_patterns_at(None, now()).await;
    assert_eq!(recovered.metadata.total_picks_analyzed, mixed_picks().len());
    assert!(recovered.total_signals() > 0);
}

#[tokio::test]
async fn test_window_and_sport_filter_reach_source() {
    let source = MockPickSource::new(mixed_picks());
    let handle = source.clone();
    let config = AnalysisConfig {
        days_back: 10,
        sport_filter: Some("NFL".into()),
        ..AnalysisConfig::default()
    };

    let summary = engine(source, config).analyze_patterns_at(Some("user-1"), now()).await;
    assert_eq!(summary.metadata.total_picks_analyzed, 0);
    assert_eq!(summary.metadata.sport_filter.as_deref(), Some("NFL"));

    let queries = handle.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].until, now());
    assert_eq!(queries[0].since, now() - chrono::Duration::days(10));
    assert_eq!(queries[0].owner.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn test_lookback_window_limits_picks() {
    let config = AnalysisConfig {
        days_back: 5,
        confidence_threshold: 0.0,
        ..AnalysisConfig::default()
    };
    let summary = analyze(mixed_picks(), config).await;
    // Picks 0..=4 days old from each of the four groups
    assert_eq!(summary.metadata.total_picks_analyzed, 20);
    assert_eq!(summary.metadata.groups_analyzed, 4);
}

#[tokio::test]
async fn test_small_groups_excluded() {
    let picks = history("Bench Player", "steals", &[Win; 4]);
    let summary = analyze(picks, config_with_threshold(0.0)).await;
    assert_eq!(summary.metadata.total_picks_analyzed, 4);
    assert_eq!(summary.total_signals(), 0);
}

#[tokio::test]
async fn test_input_order_does_not_matter() {
    let forward = analyze(mixed_picks(), config_with_threshold(0.0)).await;
    let mut reversed_picks = mixed_picks();
    reversed_picks.reverse();
    let reversed = analyze(reversed_picks, config_with_threshold(0.0)).await;
    assert_eq!(forward, reversed);
}
