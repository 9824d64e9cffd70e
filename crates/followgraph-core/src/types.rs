//! Core domain types for the follow graph.
//!
//! A `User` is a node; a `FollowEdge` is a directed `follower -> followed`
//! relationship between two users. Both are plain records: identity is
//! assigned by the storage layer, never by callers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum username length, counted in characters.
pub const MAX_USERNAME_LEN: usize = 50;

// ── Identifiers ───────────────────────────────────────────────────

/// Storage-assigned identifier of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Username ──────────────────────────────────────────────────────

/// A validated username: non-empty, at most 50 characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a raw username.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let len = raw.chars().count();

        if len == 0 {
            return Err(CoreError::InvalidUsername {
                username: raw,
                reason: "must not be empty".to_string(),
            });
        }
        if len > MAX_USERNAME_LEN {
            return Err(CoreError::InvalidUsername {
                username: raw,
                reason: format!("must be at most {MAX_USERNAME_LEN} characters, got {len}"),
            });
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Records ───────────────────────────────────────────────────────

/// A persisted user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A directed follow relationship: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}
