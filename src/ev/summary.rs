//! EV summary aggregation.
//!
//! Rolls a flat list of per-pick EV analyses up into headline numbers
//! and three breakdowns: per owner, per sport, and per calendar day.
//! Owner rollups are merged with realized performance (win rate, ROI)
//! supplied by the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calculator::EvAnalysis;
use crate::types::{Outcome, PickRecord};

// ---------------------------------------------------------------------------
// Realized performance (external input)
// ---------------------------------------------------------------------------

/// Realized results for one owner, as tracked by the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnerPerformance {
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    /// wins / (wins + losses); 0 when nothing has been decided.
    pub win_rate: f64,
    /// Σ profit_loss / Σ stake as a percentage; 0 when nothing was staked.
    pub roi: f64,
}

impl OwnerPerformance {
    /// Derive realized performance per owner from settled picks.
    pub fn from_picks(picks: &[PickRecord]) -> BTreeMap<String, OwnerPerformance> {
        let mut totals: BTreeMap<String, (usize, usize, usize, f64, f64)> = BTreeMap::new();
        for p in picks {
            let entry = totals.entry(p.owner.clone()).or_default();
            match p.outcome {
                Outcome::Win => entry.0 += 1,
                Outcome::Loss => entry.1 += 1,
                Outcome::Push => entry.2 += 1,
            }
            entry.3 += p.profit_loss;
            entry.4 += p.stake;
        }

        totals
            .into_iter()
            .map(|(owner, (wins, losses, pushes, profit, staked))| {
                let decided = wins + losses;
                let win_rate = if decided > 0 { wins as f64 / decided as f64 } else { 0.0 };
                let roi = if staked > 0.0 { profit / staked * 100.0 } else { 0.0 };
                (owner, OwnerPerformance { wins, losses, pushes, win_rate, roi })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// Per-bucket EV statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvBucket {
    pub pick_count: usize,
    pub positive_ev_count: usize,
    pub avg_ev_percentage: f64,
    pub total_expected_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRollup {
    pub owner: String,
    #[serde(flatten)]
    pub stats: EvBucket,
    /// Realized win rate, when the caller supplied it.
    pub realized_win_rate: Option<f64>,
    /// Realized ROI percentage, when the caller supplied it.
    pub realized_roi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRollup {
    pub sport: String,
    #[serde(flatten)]
    pub stats: EvBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRollup {
    pub day: NaiveDate,
    #[serde(flatten)]
    pub stats: EvBucket,
}

/// Aggregate EV report across a set of picks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvSummary {
    pub total_picks: usize,
    pub positive_ev_count: usize,
    pub negative_ev_count: usize,
    pub avg_ev_percentage: f64,
    pub total_expected_profit: f64,
    pub best_pick: Option<EvAnalysis>,
    pub worst_pick: Option<EvAnalysis>,
    pub by_owner: Vec<OwnerRollup>,
    pub by_sport: Vec<CategoryRollup>,
    pub by_day: Vec<DailyRollup>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Accumulator {
    count: usize,
    positive: usize,
    ev_pct_sum: f64,
    profit_sum: f64,
}

impl Accumulator {
    fn add(&mut self, a: &EvAnalysis) {
        self.count += 1;
        if a.is_positive() {
            self.positive += 1;
        }
        self.ev_pct_sum += a.ev_percentage;
        self.profit_sum += a.expected_profit;
    }

    fn finish(&self) -> EvBucket {
        EvBucket {
            pick_count: self.count,
            positive_ev_count: self.positive,
            avg_ev_percentage: if self.count > 0 { self.ev_pct_sum / self.count as f64 } else { 0.0 },
            total_expected_profit: self.profit_sum,
        }
    }
}

/// Build the EV summary. Rollups are ordered by key.
pub fn summarize(
    analyses: &[EvAnalysis],
    performance: &BTreeMap<String, OwnerPerformance>,
) -> EvSummary {
    if analyses.is_empty() {
        return EvSummary::default();
    }

    let mut overall = Accumulator::default();
    let mut owners: BTreeMap<&str, Accumulator> = BTreeMap::new();
    let mut sports: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut days: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();

    for a in analyses {
        overall.add(a);
        owners.entry(a.pick.owner.as_str()).or_default().add(a);
        sports.entry(a.pick.sport().to_string()).or_default().add(a);
        days.entry(a.pick.day()).or_default().add(a);
    }

    let mut ranked: Vec<&EvAnalysis> = analyses.iter().collect();
    ranked.sort_by(|a, b| {
        b.ev_percentage
            .partial_cmp(&a.ev_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let totals = overall.finish();

    EvSummary {
        total_picks: totals.pick_count,
        positive_ev_count: totals.positive_ev_count,
        negative_ev_count: analyses.iter().filter(|a| a.expected_value < 0.0).count(),
        avg_ev_percentage: totals.avg_ev_percentage,
        total_expected_profit: totals.total_expected_profit,
        best_pick: ranked.first().map(|a| (*a).clone()),
        worst_pick: ranked.last().map(|a| (*a).clone()),
        by_owner: owners
            .into_iter()
            .map(|(owner, acc)| {
                let realized = performance.get(owner);
                OwnerRollup {
                    owner: owner.to_string(),
                    stats: acc.finish(),
                    realized_win_rate: realized.map(|r| r.win_rate),
                    realized_roi: realized.map(|r| r.roi),
                }
            })
            .collect(),
        by_sport: sports
            .into_iter()
            .map(|(sport, acc)| CategoryRollup { sport, stats: acc.finish() })
            .collect(),
        by_day: days
            .into_iter()
            .map(|(day, acc)| DailyRollup { day, stats: acc.finish() })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
