//! Expected-value reporting: per-pick EV and summary rollups.

pub mod calculator;
pub mod summary;

use tracing::warn;

use crate::types::PickRecord;
pub use calculator::{analyze_pick, calculate_ev, EvAnalysis, EvMetrics};
pub use summary::{summarize, EvSummary, OwnerPerformance};

/// Full EV report for a pick collection: per-pick EV, realized owner
/// performance, then the rollups. Picks with unusable odds are skipped.
pub fn build_report(picks: &[PickRecord]) -> EvSummary {
    let analyses: Vec<EvAnalysis> = picks
        .iter()
        .filter_map(|p| match analyze_pick(p) {
            Ok(a) => Some(a),
            Err(e) => {
                warn!(subject = %p.subject, stat_type = %p.stat_type, error = %e, "Skipping pick in EV report");
                None
            }
        })
        .collect();

    let performance = OwnerPerformance::from_picks(picks);
    summarize(&analyses, &performance)
}
