//! Mock pick source for integration testing.
//!
//! Serves a fixed, in-memory pick list through the `PickSource` trait,
//! applying the query the same way file-backed sources do. Every query is
//! recorded, and a forced error makes every fetch fail.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use tipster::sources::PickSource;
use tipster::types::*;

/// Reference "now" shared by the integration scenarios.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 18, 0, 0).unwrap()
}

/// A pick `days_ago` days before `now()`, with every other field set to
/// something plausible.
pub fn make_pick(subject: &str, stat_type: &str, outcome: Outcome, days_ago: i64) -> PickRecord {
    PickRecord {
        id: None,
        subject: subject.to_string(),
        stat_type: stat_type.to_string(),
        line: 25.5,
        side: Side::Over,
        odds: -110,
        outcome,
        actual_value: 27.0,
        confidence: 55.0,
        timestamp: now() - Duration::days(days_ago) - Duration::hours(1),
        category: "NBA Props".to_string(),
        owner: "user-1".to_string(),
        stake: 100.0,
        profit_loss: match outcome {
            Outcome::Win => 90.91,
            Outcome::Loss => -100.0,
            Outcome::Push => 0.0,
        },
    }
}

/// An in-memory pick source for deterministic testing.
#[derive(Clone)]
pub struct MockPickSource {
    picks: Vec<PickRecord>,
    queries: Arc<Mutex<Vec<PickQuery>>>,
    /// If set, every fetch returns this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockPickSource {
    pub fn new(picks: Vec<PickRecord>) -> Self {
        Self {
            picks,
            queries: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Force all subsequent fetches to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    /// Every query received so far.
    pub fn queries(&self) -> Vec<PickQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PickSource for MockPickSource {
    async fn fetch_picks(&self, query: &PickQuery) -> Result<Vec<PickRecord>> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(err) = self.force_error.lock().unwrap().as_ref() {
            return Err(anyhow!("{}", err));
        }

        Ok(self.picks.iter().filter(|p| query.matches(p)).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_applies_query() {
        let mut other = make_pick("A", "points", Outcome::Win, 1);
        other.owner = "user-2".into();
        let source = MockPickSource::new(vec![
            make_pick("A", "points", Outcome::Win, 1),
            make_pick("A", "points", Outcome::Win, 45),
            other,
        ]);

        let query = PickQuery::last_days(30, now()).with_owner(Some("user-1"));
        let picks = source.fetch_picks(&query).await.unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(source.queries(), vec![query]);
    }

    #[test]
    fn test_mock_forced_error() {
        let source = MockPickSource::new(vec![make_pick("A", "points", Outcome::Win, 1)]);
        let query = PickQuery::last_days(30, now());

        source.set_error("database unavailable");
        let err = tokio_test::block_on(source.fetch_picks(&query)).unwrap_err();
        assert!(err.to_string().contains("database unavailable"));

        source.clear_error();
        let picks = tokio_test::block_on(source.fetch_picks(&query)).unwrap();
        assert_eq!(picks.len(), 1);
    }
}
