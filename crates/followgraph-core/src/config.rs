//! Configuration management for follow graph services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`FOLLOWGRAPH__` prefix, `__` separator)
//! 2. Config file (`followgraph.toml` by default)
//! 3. Defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What `follow` does when the edge already exists.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Following twice is a silent no-op.
    #[default]
    Idempotent,
    /// Following twice fails with a duplicate edge error.
    Reject,
}

/// Storage configuration.
///
/// Loaded from the `[store]` section of the config file or
/// `FOLLOWGRAPH__STORE__*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Duplicate follow handling.
    #[serde(default)]
    pub edge_policy: EdgePolicy,

    /// How long a writer waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("followgraph.db")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            edge_policy: EdgePolicy::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Load the `[store]` section from `<file_prefix>.toml` (optional) and
    /// the environment. A missing section yields the defaults.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("FOLLOWGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match cfg.get::<StoreConfig>("store") {
            Ok(c) => Ok(c),
            Err(config::ConfigError::NotFound(_)) => {
                tracing::debug!(file_prefix, "No [store] config section, using defaults");
                Ok(StoreConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
