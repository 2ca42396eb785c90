//! TIPSTER: community pick analytics
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod sport;
pub mod ev;
pub mod analysis;
pub mod sources;
pub mod engine;
