//! JSON file pick source.
//!
//! Reads a JSON array of picks (the same shape the store exports) and
//! applies the query filters in memory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::PickSource;
use crate::types::{PickQuery, PickRecord};

pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PickSource for JsonFileSource {
    async fn fetch_picks(&self, query: &PickQuery) -> Result<Vec<PickRecord>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read picks from {}", self.path.display()))?;

        let all: Vec<PickRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse picks from {}", self.path.display()))?;
        let total = all.len();

        let picks: Vec<PickRecord> = all.into_iter().filter(|p| query.matches(p)).collect();

        debug!(
            path = %self.path.display(),
            total,
            matched = picks.len(),
            "Loaded picks from file"
        );

        Ok(picks)
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
