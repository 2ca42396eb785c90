//! Pick sources.
//!
//! Defines the `PickSource` trait and provides implementations for:
//! - Supabase (PostgREST), the production pick store
//! - JSON file, for exports and offline analysis

pub mod json_file;
pub mod supabase;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{PickQuery, PickRecord};

/// Abstraction over wherever settled picks live.
///
/// Implementors apply the query's time window, owner and sport filters.
/// Fetching is the only I/O the engine performs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickSource: Send + Sync {
    /// Fetch all picks matching the query.
    async fn fetch_picks(&self, query: &PickQuery) -> Result<Vec<PickRecord>>;

    /// Source name for logging and identification.
    fn name(&self) -> &'static str;
}
