//! SQLite connection management and the shared store handle.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{ffi, Connection, ErrorCode};

use followgraph_core::{EdgePolicy, GraphEvent, StoreConfig, User, UserId};

use crate::schema;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Referential error: user {user_id} does not exist")]
    ReferentialError { user_id: UserId },

    #[error("Duplicate edge: user {follower_id} already follows user {followed_id}")]
    DuplicateEdge {
        follower_id: UserId,
        followed_id: UserId,
    },

    #[error("User not found: {id}")]
    NotFound { id: UserId },

    #[error("SQLite connection error: {0}")]
    Connection(String),

    #[error("SQLite query error: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Thread-safe handle to the follow graph database.
///
/// This is the single point of access for all follow graph operations.
/// Clone is cheap (inner Arc); clones share one connection.
#[derive(Clone)]
pub struct FollowStore {
    conn: Arc<Mutex<Connection>>,
    edge_policy: EdgePolicy,
    events: Option<Sender<GraphEvent>>,
}

impl FollowStore {
    /// Open (or create) the database file named in the configuration.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.database_path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(
            path = %config.database_path.display(),
            journal_mode = %mode,
            "Opened follow graph database"
        );
        Self::from_connection(conn, config.edge_policy)
    }

    /// Create a private in-memory database (useful for tests).
    pub fn open_in_memory(edge_policy: EdgePolicy) -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::from_connection(conn, edge_policy)
    }

    /// Wrap an already-open connection. Enables foreign keys and installs
    /// the schema if it is missing.
    pub fn from_connection(conn: Connection, edge_policy: EdgePolicy) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        schema::install(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            edge_policy,
            events: None,
        })
    }

    /// Publish a [`GraphEvent`] to `sink` after every committed mutation.
    pub fn with_event_sink(mut self, sink: Sender<GraphEvent>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Lock the shared connection.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Log and publish an event. A dropped receiver is not an error.
    pub(crate) fn emit(&self, event: GraphEvent) {
        tracing::debug!(event_id = %event.id.0, payload = ?event.payload, "Graph event");

        if let Some(sink) = &self.events {
            if sink.send(event).is_err() {
                tracing::debug!("Event receiver dropped, event discarded");
            }
        }
    }
}

// ── Row Helpers ──────────────────────────────────────────────────

/// Columns selected by every user query, in order.
pub(crate) const USER_COLUMNS: &str = "u.id, u.username, u.created_at";

/// Map a row selected with [`USER_COLUMNS`] into a `User`.
pub(crate) fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(2)?;
    Ok(User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        created_at: parse_timestamp(2, &created_at)?,
    })
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Translate SQLite constraint failures into the store's error taxonomy.
pub(crate) fn classify(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, msg) = &err {
        let field_constraint = failure.code == ErrorCode::ConstraintViolation
            && matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE
                    | ffi::SQLITE_CONSTRAINT_CHECK
                    | ffi::SQLITE_CONSTRAINT_NOTNULL
            );
        if field_constraint {
            let detail = msg.clone().unwrap_or_else(|| failure.to_string());
            return StoreError::ConstraintViolation(detail);
        }
    }
    StoreError::Query(err)
}
