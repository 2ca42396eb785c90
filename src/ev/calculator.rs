//! Expected-value calculation for individual picks.
//!
//! Converts American odds to decimal odds, compares the implied
//! probability to the analyst's probability estimate, and scales the
//! per-unit edge by stake.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{PickRecord, TipsterError};

/// Stake used when a pick has no positive stake recorded.
pub const DEFAULT_STAKE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Odds conversion
// ---------------------------------------------------------------------------

/// Convert American odds to decimal odds.
///
/// +150 → 2.50, -110 → 1.909. Zero odds are rejected.
pub fn american_to_decimal(american_odds: i32) -> Result<f64, TipsterError> {
    if american_odds == 0 {
        return Err(TipsterError::InvalidOdds(american_odds));
    }
    let odds = american_odds as f64;
    if odds > 0.0 {
        Ok(odds / 100.0 + 1.0)
    } else {
        Ok(100.0 / odds.abs() + 1.0)
    }
}

/// Probability implied by the offered price alone.
pub fn implied_probability(american_odds: i32) -> Result<f64, TipsterError> {
    Ok(1.0 / american_to_decimal(american_odds)?)
}

// ---------------------------------------------------------------------------
// EV metrics
// ---------------------------------------------------------------------------

/// EV metrics for one price/probability/stake triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvMetrics {
    pub implied_probability: f64,
    /// EV per unit stake.
    pub expected_value: f64,
    pub ev_percentage: f64,
    pub expected_profit: f64,
}

/// Compute expected value for a wager.
///
/// `true_probability` is not clamped: out-of-range inputs produce the
/// numerically consistent (if non-physical) EV rather than an error.
///
/// EV = p × decimal_odds − 1
/// EV% = EV / implied_probability × 100
pub fn calculate_ev(
    american_odds: i32,
    true_probability: f64,
    stake: f64,
) -> Result<EvMetrics, TipsterError> {
    let decimal_odds = american_to_decimal(american_odds)?;
    let implied_probability = 1.0 / decimal_odds;
    let expected_value = true_probability * decimal_odds - 1.0;
    let ev_percentage = expected_value / implied_probability * 100.0;
    let expected_profit = expected_value * stake;

    Ok(EvMetrics {
        implied_probability,
        expected_value,
        ev_percentage,
        expected_profit,
    })
}

// ---------------------------------------------------------------------------
// Per-pick analysis
// ---------------------------------------------------------------------------

/// A pick enriched with its EV metrics. Recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvAnalysis {
    pub pick: PickRecord,
    pub implied_probability: f64,
    /// confidence / 100
    pub true_probability: f64,
    pub expected_value: f64,
    pub ev_percentage: f64,
    pub expected_profit: f64,
}

impl EvAnalysis {
    pub fn is_positive(&self) -> bool {
        self.expected_value > 0.0
    }
}

/// Enrich a pick with EV metrics using its confidence as the true
/// probability and its stake (or `DEFAULT_STAKE` when not positive).
pub fn analyze_pick(pick: &PickRecord) -> Result<EvAnalysis, TipsterError> {
    let true_probability = pick.true_probability();
    let stake = if pick.stake > 0.0 { pick.stake } else { DEFAULT_STAKE };
    let metrics = calculate_ev(pick.odds, true_probability, stake)?;

    debug!(
        subject = %pick.subject,
        stat_type = %pick.stat_type,
        odds = pick.odds,
        true_prob = format!("{:.1}%", true_probability * 100.0),
        implied = format!("{:.1}%", metrics.implied_probability * 100.0),
        ev_pct = format!("{:.2}%", metrics.ev_percentage),
        "Pick EV computed"
    );

    Ok(EvAnalysis {
        pick: pick.clone(),
        implied_probability: metrics.implied_probability,
        true_probability,
        expected_value: metrics.expected_value,
        ev_percentage: metrics.ev_percentage,
        expected_profit: metrics.expected_profit,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
