//! Read operations for the follow graph.
//!
//! `list_followed` and `list_followers` read the same edge table from
//! opposite columns, so `b ∈ list_followed(a)` exactly when
//! `a ∈ list_followers(b)`.

use rusqlite::{params, OptionalExtension};

use followgraph_core::{FollowEdge, User, UserId};

use crate::client::{parse_timestamp, user_from_row, FollowStore, StoreError, USER_COLUMNS};

impl FollowStore {
    // ── Single User Lookups ──────────────────────────────────────

    /// Get a user by id.
    pub fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        let conn = self.lock()?;
        let sql = format!(r#"SELECT {USER_COLUMNS} FROM "user" AS u WHERE u.id = ?1"#);
        conn.query_row(&sql, params![id.0], user_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { id })
    }

    /// Find a user by exact username.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.lock()?;
        let sql = format!(r#"SELECT {USER_COLUMNS} FROM "user" AS u WHERE u.username = ?1"#);
        Ok(conn
            .query_row(&sql, params![username], user_from_row)
            .optional()?)
    }

    // ── List Queries ─────────────────────────────────────────────

    /// List users ordered by id.
    pub fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, StoreError> {
        let conn = self.lock()?;
        let sql = format!(
            r#"SELECT {USER_COLUMNS} FROM "user" AS u
               ORDER BY u.id
               LIMIT ?1 OFFSET ?2"#
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit, offset], user_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Count all users.
    pub fn count_users(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        Ok(conn.query_row(r#"SELECT count(*) FROM "user""#, [], |row| row.get(0))?)
    }

    // ── Neighbor Queries ─────────────────────────────────────────

    /// Users that `user` follows (outbound edges), ordered by id.
    pub fn list_followed(&self, user: UserId) -> Result<Vec<User>, StoreError> {
        let users = self.neighbors(
            "JOIN association_table_follow AS f ON f.followed_id = u.id
             WHERE f.follower_id = ?1",
            user,
        )?;
        tracing::debug!(user_id = %user, count = users.len(), "Listed followed");
        Ok(users)
    }

    /// Users following `user` (inbound edges), ordered by id.
    pub fn list_followers(&self, user: UserId) -> Result<Vec<User>, StoreError> {
        let users = self.neighbors(
            "JOIN association_table_follow AS f ON f.follower_id = u.id
             WHERE f.followed_id = ?1",
            user,
        )?;
        tracing::debug!(user_id = %user, count = users.len(), "Listed followers");
        Ok(users)
    }

    /// Whether the edge `follower -> followed` exists.
    pub fn is_following(&self, follower: UserId, followed: UserId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        Ok(conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM association_table_follow
                            WHERE follower_id = ?1 AND followed_id = ?2)",
            params![follower.0, followed.0],
            |row| row.get(0),
        )?)
    }

    /// Number of users `user` follows.
    pub fn count_followed(&self, user: UserId) -> Result<i64, StoreError> {
        self.count_edges("follower_id", user)
    }

    /// Number of users following `user`.
    pub fn count_followers(&self, user: UserId) -> Result<i64, StoreError> {
        self.count_edges("followed_id", user)
    }

    /// All edges touching `user` in either direction, oldest first.
    pub fn list_edges(&self, user: UserId) -> Result<Vec<FollowEdge>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT follower_id, followed_id, created_at FROM association_table_follow
             WHERE follower_id = ?1 OR followed_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![user.0], |row| {
            let created_at: String = row.get(2)?;
            Ok(FollowEdge {
                follower_id: UserId(row.get(0)?),
                followed_id: UserId(row.get(1)?),
                created_at: parse_timestamp(2, &created_at)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn neighbors(&self, join: &str, user: UserId) -> Result<Vec<User>, StoreError> {
        let conn = self.lock()?;
        let sql = format!(r#"SELECT {USER_COLUMNS} FROM "user" AS u {join} ORDER BY u.id"#);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user.0], user_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn count_edges(&self, column: &'static str, user: UserId) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let sql = format!("SELECT count(*) FROM association_table_follow WHERE {column} = ?1");
        Ok(conn.query_row(&sql, params![user.0], |row| row.get(0))?)
    }
}
