//! Pick grouping by `subject|stat-type`.

use std::collections::BTreeMap;

use crate::types::PickRecord;

/// Picks partitioned by group key. Ordered by key so every detector walks
/// groups in the same, reproducible order.
pub type PickGroups<'a> = BTreeMap<String, Vec<&'a PickRecord>>;

/// Partition picks by `subject|stat-type`. No filtering happens here;
/// each detector applies its own sample-size floor.
pub fn group_picks(picks: &[PickRecord]) -> PickGroups<'_> {
    let mut groups: PickGroups<'_> = BTreeMap::new();
    for pick in picks {
        groups.entry(pick.group_key()).or_default().push(pick);
    }
    groups
}

/// Copy of a group ordered most recent first. The sort is stable, so picks
/// sharing a timestamp keep their input order.
pub fn recent_first<'a>(group: &[&'a PickRecord]) -> Vec<&'a PickRecord> {
    let mut sorted = group.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}
