//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the Supabase service key) are referenced by env-var name in
//! the config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::analysis::DetectorConfig;
use crate::types::TipsterError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub detectors: DetectorConfig,
    pub source: SourceConfig,
}

/// Analysis options recognized by the engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lookback window for the upstream fetch. Not used by the detectors.
    pub days_back: i64,
    /// Smallest group each detector will look at.
    pub min_sample_size: usize,
    /// Post-hoc filter on every detector's findings.
    pub confidence_threshold: f64,
    /// Passed through to the pick source.
    pub sport_filter: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            days_back: 30,
            min_sample_size: 5,
            confidence_threshold: 0.7,
            sport_filter: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), TipsterError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(TipsterError::Config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.min_sample_size == 0 {
            return Err(TipsterError::Config("min_sample_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Where picks are fetched from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A JSON array of picks on disk.
    Json { path: String },
    /// Supabase PostgREST table.
    Supabase {
        url: String,
        #[serde(default = "default_table")]
        table: String,
        api_key_env: String,
        #[serde(default)]
        page_size: Option<u32>,
    },
}

fn default_table() -> String {
    "picks".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
