//! followgraph-core: Shared types, configuration, and error handling for the follow graph.
//!
//! This crate provides the foundational types used across all follow graph components:
//! - User and follow edge records
//! - Username validation rules
//! - Event types emitted after graph mutations
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use self::config::{EdgePolicy, StoreConfig};
pub use error::CoreError;
pub use events::{EventPayload, GraphEvent};
pub use types::{FollowEdge, User, UserId, Username};
