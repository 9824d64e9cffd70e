//! Error types for the followgraph-cli crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unknown user: {username}")]
    UnknownUser { username: String },

    #[error("Config error: {0}")]
    Config(#[from] followgraph_core::CoreError),

    #[error("Store error: {0}")]
    Store(#[from] followgraph_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
