//! Store configuration as seen by the CLI: config file and environment,
//! then command-line overrides.

use std::path::PathBuf;

use followgraph_core::StoreConfig;

use crate::error::Result;

/// Load `[store]` from `<file_prefix>.toml` and the environment, then apply
/// the `--database` override.
pub fn load_store_config(file_prefix: &str, database: Option<PathBuf>) -> Result<StoreConfig> {
    let mut store_config = StoreConfig::load(file_prefix)?;
    if let Some(path) = database {
        store_config.database_path = path;
    }
    tracing::debug!(?store_config, "Loaded configuration");
    Ok(store_config)
}
