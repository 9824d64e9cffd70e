//! Write operations for the follow graph.
//!
//! Every mutation runs inside one SQLite transaction. Early returns drop
//! the transaction, which rolls it back, so the edge table is never left
//! half-written. Events are emitted only after commit.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Transaction};

use followgraph_core::{EdgePolicy, EventPayload, GraphEvent, User, UserId, Username};

use crate::client::{classify, user_from_row, FollowStore, StoreError, USER_COLUMNS};

impl FollowStore {
    // ── Users ────────────────────────────────────────────────────

    /// Create a user. Fails with `ConstraintViolation` if the username is
    /// empty, longer than 50 characters, or already taken.
    pub fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let username =
            Username::parse(username).map_err(|e| StoreError::ConstraintViolation(e.to_string()))?;
        let created_at = Utc::now();

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"INSERT INTO "user" (username, created_at) VALUES (?1, ?2)"#,
            params![username.as_str(), created_at.to_rfc3339()],
        )
        .map_err(classify)?;
        let id = UserId(tx.last_insert_rowid());
        tx.commit()?;

        tracing::info!(user_id = %id, username = %username, "User created");
        let user = User {
            id,
            username: username.into_inner(),
            created_at,
        };
        self.emit(GraphEvent::new(EventPayload::UserCreated {
            user_id: user.id,
            username: user.username.clone(),
        }));
        Ok(user)
    }

    /// Delete a user and every follow edge touching it.
    /// Returns `false` if no such user existed.
    pub fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let Some(user) = fetch_user(&tx, id)? else {
            return Ok(false);
        };

        let edges_removed: i64 = tx.query_row(
            "SELECT count(*) FROM association_table_follow
             WHERE follower_id = ?1 OR followed_id = ?1",
            params![id.0],
            |row| row.get(0),
        )?;
        tx.execute(r#"DELETE FROM "user" WHERE id = ?1"#, params![id.0])?;
        tx.commit()?;

        tracing::info!(user_id = %id, edges_removed, "User deleted");
        self.emit(GraphEvent::new(EventPayload::UserDeleted {
            user_id: id,
            username: user.username,
            edges_removed: edges_removed as u64,
        }));
        Ok(true)
    }

    // ── Edges ────────────────────────────────────────────────────

    /// Record that `follower` follows `followed`.
    ///
    /// Returns `true` if a new edge was written. An existing edge is a
    /// no-op under [`EdgePolicy::Idempotent`] and a `DuplicateEdge`
    /// error under [`EdgePolicy::Reject`].
    pub fn follow(&self, follower: UserId, followed: UserId) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        ensure_user(&tx, follower)?;
        ensure_user(&tx, followed)?;
        let created = insert_edge(&tx, follower, followed, self.edge_policy())?;
        tx.commit()?;

        if created {
            self.emit_followed(follower, followed);
        }
        Ok(created)
    }

    /// Follow several users at once. Either every edge is written or none.
    /// Returns the number of edges newly written.
    pub fn follow_many(&self, follower: UserId, followed: &[UserId]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        ensure_user(&tx, follower)?;
        let mut created = Vec::with_capacity(followed.len());
        for &target in followed {
            ensure_user(&tx, target)?;
            if insert_edge(&tx, follower, target, self.edge_policy())? {
                created.push(target);
            }
        }
        tx.commit()?;

        for &target in &created {
            self.emit_followed(follower, target);
        }
        Ok(created.len())
    }

    /// Remove the edge `follower -> followed`. Removing an absent edge is
    /// not an error. Returns `true` if an edge was removed.
    pub fn unfollow(&self, follower: UserId, followed: UserId) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM association_table_follow
             WHERE follower_id = ?1 AND followed_id = ?2",
            params![follower.0, followed.0],
        )?;
        tx.commit()?;

        if removed == 0 {
            tracing::debug!(follower_id = %follower, followed_id = %followed, "Unfollow: no edge");
            return Ok(false);
        }

        tracing::info!(follower_id = %follower, followed_id = %followed, "Follow edge removed");
        self.emit(GraphEvent::new(EventPayload::Unfollowed {
            follower_id: follower,
            followed_id: followed,
        }));
        Ok(true)
    }

    fn emit_followed(&self, follower: UserId, followed: UserId) {
        tracing::info!(follower_id = %follower, followed_id = %followed, "Follow edge created");
        self.emit(GraphEvent::new(EventPayload::Followed {
            follower_id: follower,
            followed_id: followed,
        }));
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn fetch_user(tx: &Transaction<'_>, id: UserId) -> Result<Option<User>, StoreError> {
    let sql = format!(r#"SELECT {USER_COLUMNS} FROM "user" AS u WHERE u.id = ?1"#);
    Ok(tx.query_row(&sql, params![id.0], user_from_row).optional()?)
}

fn ensure_user(tx: &Transaction<'_>, id: UserId) -> Result<(), StoreError> {
    let exists: bool = tx.query_row(
        r#"SELECT EXISTS (SELECT 1 FROM "user" WHERE id = ?1)"#,
        params![id.0],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(StoreError::ReferentialError { user_id: id })
    }
}

/// Insert one edge, honouring the duplicate policy. Both endpoints must
/// already be known to exist.
fn insert_edge(
    tx: &Transaction<'_>,
    follower: UserId,
    followed: UserId,
    policy: EdgePolicy,
) -> Result<bool, StoreError> {
    let exists: bool = tx.query_row(
        "SELECT EXISTS (SELECT 1 FROM association_table_follow
                        WHERE follower_id = ?1 AND followed_id = ?2)",
        params![follower.0, followed.0],
        |row| row.get(0),
    )?;

    if exists {
        return match policy {
            EdgePolicy::Idempotent => {
                tracing::debug!(follower_id = %follower, followed_id = %followed, "Already following");
                Ok(false)
            }
            EdgePolicy::Reject => Err(StoreError::DuplicateEdge {
                follower_id: follower,
                followed_id: followed,
            }),
        };
    }

    tx.execute(
        "INSERT INTO association_table_follow (follower_id, followed_id, created_at)
         VALUES (?1, ?2, ?3)",
        params![follower.0, followed.0, Utc::now().to_rfc3339()],
    )
    .map_err(classify)?;
    Ok(true)
}
