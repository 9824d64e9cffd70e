//! Table layout for the follow graph.
//!
//! `association_table_follow` holds one row per directed edge; the left
//! column follows the right column. Edges are removed together with
//! either endpoint.

use rusqlite::Connection;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE CHECK (length(username) BETWEEN 1 AND 50),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS association_table_follow (
    follower_id INTEGER NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
    followed_id INTEGER NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (follower_id, followed_id)
);

CREATE INDEX IF NOT EXISTS idx_follow_followed
    ON association_table_follow (followed_id);
"#;

/// Create all tables and indexes. Safe to call on an existing database.
pub fn install(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
