//! EV reporting through `AnalysisEngine` with an in-memory source.

use tipster::analysis::DetectorConfig;
use tipster::config::AnalysisConfig;
use tipster::engine::AnalysisEngine;
use tipster::ev::EvSummary;
use tipster::types::Outcome::{Loss, Push, Win};
use tipster::types::PickRecord;

use crate::mock_source::{make_pick, now, MockPickSource};

fn engine(source: MockPickSource) -> AnalysisEngine {
    AnalysisEngine::new(Box::new(source), AnalysisConfig::default(), DetectorConfig::default())
}

fn slate() -> Vec<PickRecord> {
    let mut value = make_pick("Josh Allen", "passing yards", Win, 1);
    value.category = "NFL".into();
    value.owner = "sharp".into();
    value.odds = 150;
    value.confidence = 50.0;

    let mut chalk = make_pick("Josh Allen", "rushing yards", Loss, 1);
    chalk.category = "NFL".into();
    chalk.owner = "sharp".into();
    chalk.odds = -200;
    chalk.confidence = 60.0;
    chalk.profit_loss = -100.0;

    let mut push = make_pick("Shohei Ohtani", "total bases", Push, 3);
    push.category = "MLB".into();
    push.owner = "casual".into();

    vec![value, chalk, push, make_pick("LeBron James", "points", Win, 3)]
}

#[tokio::test]
async fn test_ev_report_headline_numbers() {
    let report = engine(MockPickSource::new(slate())).ev_report_at(None, now()).await;

    assert_eq!(report.total_picks, 4);
    // +150 at 50%: 0.5 * 2.5 - 1 = +0.25
    // -200 at 60%: 0.6 * 1.5 - 1 = -0.10
    // -110 at 55%: positive (twice)
    assert_eq!(report.positive_ev_count, 3);
    assert_eq!(report.negative_ev_count, 1);

    let best = report.best_pick.as_ref().unwrap();
    assert_eq!(best.pick.odds, 150);
    assert!((best.expected_value - 0.25).abs() < 1e-9);
    assert!((best.ev_percentage - 62.5).abs() < 1e-9);
    let worst = report.worst_pick.as_ref().unwrap();
    assert_eq!(worst.pick.odds, -200);
    assert!((worst.expected_profit + 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_ev_report_rollups_ordered_by_key() {
    let report = engine(MockPickSource::new(slate())).ev_report_at(None, now()).await;

    let owners: Vec<&str> = report.by_owner.iter().map(|o| o.owner.as_str()).collect();
    assert_eq!(owners, vec!["casual", "sharp", "user-1"]);

    let sharp = &report.by_owner[1];
    assert_eq!(sharp.stats.pick_count, 2);
    assert_eq!(sharp.stats.positive_ev_count, 1);
    assert_eq!(sharp.realized_win_rate, Some(0.5));

    // Only a push: nothing decided, nothing won
    let casual = &report.by_owner[0];
    assert_eq!(casual.realized_win_rate, Some(0.0));

    let sports: Vec<&str> = report.by_sport.iter().map(|s| s.sport.as_str()).collect();
    assert_eq!(sports, vec!["MLB", "NBA", "NFL"]);

    assert_eq!(report.by_day.len(), 2);
    assert!(report.by_day[0].day < report.by_day[1].day);
    assert_eq!(report.by_day.iter().map(|d| d.stats.pick_count).sum::<usize>(), 4);
}

#[tokio::test]
async fn test_ev_report_owner_scope() {
    let report = engine(MockPickSource::new(slate()))
        .ev_report_at(Some("sharp"), now())
        .await;
    assert_eq!(report.total_picks, 2);
    assert_eq!(report.by_owner.len(), 1);
}

#[tokio::test]
async fn test_ev_report_skips_zero_odds() {
    let mut picks = slate();
    picks[3].odds = 0;
    let report = engine(MockPickSource::new(picks)).ev_report_at(None, now()).await;
    assert_eq!(report.total_picks, 3);
}

#[tokio::test]
async fn test_ev_report_fetch_failure() {
    let source = MockPickSource::new(slate());
    source.set_error("timeout");
    let report = engine(source).ev_report_at(None, now()).await;
    assert_eq!(report, EvSummary::default());
}
