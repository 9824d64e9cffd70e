//! Event types emitted after committed graph mutations.
//!
//! The store publishes one event per successful mutation so that callers
//! (feeds, notifications, audit) can react without polling the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// An event emitted by the follow graph store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl GraphEvent {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// The event payload, tagged by type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    // ── User lifecycle ────────────────────────────────────────
    /// A user was created.
    UserCreated { user_id: UserId, username: String },
    /// A user was deleted along with every edge touching it.
    UserDeleted {
        user_id: UserId,
        username: String,
        edges_removed: u64,
    },

    // ── Edge lifecycle ────────────────────────────────────────
    /// `follower_id` started following `followed_id`.
    Followed {
        follower_id: UserId,
        followed_id: UserId,
    },
    /// `follower_id` stopped following `followed_id`.
    Unfollowed {
        follower_id: UserId,
        followed_id: UserId,
    },
}
