//! followgraph-store: SQLite persistence for users and follow edges.
//!
//! This crate is the single mutation point for the follow graph.
//! All reads and writes flow through [`FollowStore`] so that edge
//! uniqueness, referential integrity, and event emission stay consistent.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod schema;

pub use client::{FollowStore, StoreError};
