//! Configuration loading
//!
//! Settings resolve in priority order: environment variable, then TOML
//! config file, then compiled default.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Synchronization strategy for hierarchy edges and characteristic records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    /// Per-node round trips, O(N) store operations for N children
    Incremental,
    /// Bulk queries, O(1) amortized store operations regardless of child count
    #[default]
    Batch,
}

impl FromStr for SyncStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incremental" => Ok(SyncStrategy::Incremental),
            "batch" => Ok(SyncStrategy::Batch),
            other => Err(Error::Config(format!(
                "Unknown sync strategy '{}' (expected 'incremental' or 'batch')",
                other
            ))),
        }
    }
}

/// Ingest pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Path to the SQLite store
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Strategy used by the hierarchy resolver and characteristic synchronizer
    #[serde(default)]
    pub strategy: SyncStrategy,

    /// Default tracing filter, applied when RUST_LOG is unset
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("spl.db")
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            strategy: SyncStrategy::default(),
            log_filter: None,
        }
    }
}

impl IngestConfig {
    /// Load configuration, applying environment overrides on top of the
    /// TOML file (explicit path argument, then SPL_CONFIG, then defaults).
    ///
    /// Overrides: SPL_DATABASE_PATH, SPL_SYNC_STRATEGY, SPL_LOG.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match std::env::var("SPL_CONFIG") {
                Ok(p) => Self::from_file(Path::new(&p))?,
                Err(_) => Self::default(),
            },
        };

        if let Ok(db_path) = std::env::var("SPL_DATABASE_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(strategy) = std::env::var("SPL_SYNC_STRATEGY") {
            config.strategy = strategy.parse()?;
        }
        if let Ok(filter) = std::env::var("SPL_LOG") {
            config.log_filter = Some(filter);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}
