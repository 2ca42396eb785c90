//! Win/loss streak detection.
//!
//! Finds the current run of same-outcome picks per group, walking back
//! from the most recent pick. Pushes are stepped over without breaking
//! the run. Runs are scored by how unlikely they are under the group's
//! own historical win rate.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::grouping::{recent_first, PickGroups};
use super::stats::OutcomeTally;
use super::Scored;
use crate::types::{Outcome, PickRecord};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Shortest run worth reporting.
    pub min_streak: usize,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self { min_streak: 3 }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakType {
    Win,
    Loss,
}

impl fmt::Display for StreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreakType::Win => write!(f, "win"),
            StreakType::Loss => write!(f, "loss"),
        }
    }
}

/// A current run for one subject/stat-type group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakAnalysis {
    pub subject: String,
    pub stat_type: String,
    pub streak_type: StreakType,
    pub current_streak: usize,
    /// Chance of this run under the historical rate: p^streak.
    pub streak_probability: f64,
    pub historical_win_rate: f64,
    /// Picks in the group, pushes included.
    pub sample_size: usize,
    /// Wins + losses in the group.
    pub decided_games: usize,
    pub confidence_score: f64,
}

impl fmt::Display for StreakAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}-pick {} streak (hist {:.0}%, p={:.3}, conf {:.0}%)",
            self.subject,
            self.stat_type,
            self.current_streak,
            self.streak_type,
            self.historical_win_rate * 100.0,
            self.streak_probability,
            self.confidence_score * 100.0,
        )
    }
}

impl Scored for StreakAnalysis {
    fn confidence(&self) -> f64 {
        self.confidence_score
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub struct StreakAnalyzer {
    config: StreakConfig,
}

impl StreakAnalyzer {
    pub fn new(config: StreakConfig) -> Self {
        Self { config }
    }

    /// Current streaks for every group of at least `min_sample_size`
    /// picks, sorted by confidence descending.
    pub fn analyze(&self, groups: &PickGroups<'_>, min_sample_size: usize) -> Vec<StreakAnalysis> {
        let mut streaks: Vec<StreakAnalysis> = groups
            .values()
            .filter(|g| g.len() >= min_sample_size)
            .filter_map(|g| self.analyze_group(g))
            .collect();

        streaks.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        streaks
    }

    fn analyze_group(&self, group: &[&PickRecord]) -> Option<StreakAnalysis> {
        let sorted = recent_first(group);
        let latest = sorted.first()?;

        let streak_type = match latest.outcome {
            Outcome::Win => StreakType::Win,
            Outcome::Loss => StreakType::Loss,
            Outcome::Push => {
                debug!(subject = %latest.subject, stat_type = %latest.stat_type, "Latest pick is a push, no streak");
                return None;
            }
        };

        let current_streak = count_run(&sorted, latest.outcome);
        if current_streak < self.config.min_streak {
            return None;
        }

        let tally = OutcomeTally::from_picks(&sorted);
        let historical_win_rate = tally.win_rate()?;
        let p = match streak_type {
            StreakType::Win => historical_win_rate,
            StreakType::Loss => 1.0 - historical_win_rate,
        };
        let streak_probability = p.powi(current_streak as i32);

        let rarity = (1.0 - streak_probability * 10.0).max(0.0);
        let length_score = (current_streak as f64 / 10.0).min(1.0);
        let sample_score = (tally.decided() as f64 / 20.0).min(1.0);
        let confidence_score = 0.5 * rarity + 0.3 * length_score + 0.2 * sample_score;

        debug!(
            subject = %latest.subject,
            stat_type = %latest.stat_type,
            streak = current_streak,
            kind = %streak_type,
            probability = format!("{:.4}", streak_probability),
            confidence = format!("{:.2}", confidence_score),
            "Streak detected"
        );

        Some(StreakAnalysis {
            subject: latest.subject.clone(),
            stat_type: latest.stat_type.clone(),
            streak_type,
            current_streak,
            streak_probability,
            historical_win_rate,
            sample_size: sorted.len(),
            decided_games: tally.decided(),
            confidence_score,
        })
    }
}

/// Length of the leading run of `outcome`, skipping pushes.
fn count_run(sorted: &[&PickRecord], outcome: Outcome) -> usize {
    let mut run = 0;
    for p in sorted {
        if !p.outcome.is_decided() {
            continue;
        }
        if p.outcome != outcome {
            break;
        }
        run += 1;
    }
    run
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::grouping::group_picks;
    use chrono::{Duration, Utc};

    /// Build a group from outcomes listed most recent first.
    fn make_series(subject: &str, outcomes: &[Outcome]) -> Vec<PickRecord> {
        let now = Utc::now();
        outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| PickRecord {
                subject: subject.to_string(),
                outcome: *o,
                timestamp: now - Duration::hours(i as i64),
                ..PickRecord::sample()
            })
            .collect()
    }

    fn run(outcomes: &[Outcome]) -> Vec<StreakAnalysis> {
        let picks = make_series("Player", outcomes);
        let groups = group_picks(&picks);
        StreakAnalyzer::new(StreakConfig::default()).analyze(&groups, 5)
    }

    use crate::types::Outcome::{Loss as L, Push as P, Win as W};

    #[test]
    fn test_win_streak_of_five() {
        let outcomes = [W, W, W, W, W, L, L, L, L, L, W, W, W, W, W];
        let streaks = run(&outcomes);
        assert_eq!(streaks.len(), 1);
        let s = &streaks[0];
        assert_eq!(s.current_streak, 5);
        assert_eq!(s.streak_type, StreakType::Win);
        assert!((s.historical_win_rate - 10.0 / 15.0).abs() < 1e-12);
        assert!((s.streak_probability - (10.0f64 / 15.0).powi(5)).abs() < 1e-12);
        assert_eq!(s.sample_size, 15);
    }

    #[test]
    fn test_pushes_do_not_break_streak() {
        let streaks = run(&[L, P, L, P, L, W, W]);
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].current_streak, 3);
        assert_eq!(streaks[0].streak_type, StreakType::Loss);
        assert_eq!(streaks[0].decided_games, 5);
        assert!((streaks[0].historical_win_rate - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_latest_push_skips_group() {
        assert!(run(&[P, W, W, W, W, W]).is_empty());
    }

    #[test]
    fn test_short_streak_not_emitted() {
        assert!(run(&[W, W, L, L, L, L]).is_empty());
    }

    #[test]
    fn test_small_group_skipped() {
        assert!(run(&[W, W, W, W]).is_empty());
    }

    #[test]
    fn test_confidence_formula() {
        let streaks = run(&[W, W, W, L, L, L, L, L, L, L]);
        let s = &streaks[0];
        let p: f64 = 0.3f64.powi(3);
        let expected = 0.5 * (1.0 - p * 10.0).max(0.0) + 0.3 * 0.3 + 0.2 * 0.5;
        assert!((s.confidence_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_by_confidence() {
        let mut picks = make_series("Short", &[W, W, W, L, W, L]);
        picks.extend(make_series("Long", &[L, L, L, L, L, L, L, W, W, W, W, W]));
        let groups = group_picks(&picks);
        let streaks = StreakAnalyzer::new(StreakConfig::default()).analyze(&groups, 5);
        assert_eq!(streaks.len(), 2);
        assert!(streaks[0].confidence_score >= streaks[1].confidence_score);
        assert_eq!(streaks[0].subject, "Long");
    }
}
