use thiserror::Error;

/// Top-level error type for the follow graph core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid username {username:?}: {reason}")]
    InvalidUsername { username: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
