//! Subcommands and their execution against a [`FollowStore`].

use clap::Subcommand;
use serde::Serialize;

use followgraph_core::User;
use followgraph_store::FollowStore;

use crate::error::{CliError, Result};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a user.
    CreateUser {
        /// Username (1 to 50 characters, unique).
        username: String,
    },
    /// Delete a user and every follow edge touching it.
    DeleteUser { username: String },
    /// Make <follower> follow <followed>.
    Follow { follower: String, followed: String },
    /// Make <follower> stop following <followed>.
    Unfollow { follower: String, followed: String },
    /// List the users <username> follows.
    Followed { username: String },
    /// List the users following <username>.
    Followers { username: String },
    /// List all users.
    Users {
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

/// Result of an edge mutation.
#[derive(Debug, Serialize)]
struct EdgeChange<'a> {
    follower: &'a str,
    followed: &'a str,
    changed: bool,
}

/// A user together with one side of its neighbourhood.
#[derive(Debug, Serialize)]
struct Neighbourhood {
    user: User,
    count: usize,
    users: Vec<User>,
}

/// Run one command and render its result as JSON.
pub fn execute(store: &FollowStore, command: Command) -> Result<serde_json::Value> {
    let value = match command {
        Command::CreateUser { username } => serde_json::to_value(store.create_user(&username)?)?,
        Command::DeleteUser { username } => {
            let user = resolve(store, &username)?;
            let deleted = store.delete_user(user.id)?;
            serde_json::json!({ "username": username, "deleted": deleted })
        }
        Command::Follow { follower, followed } => {
            let a = resolve(store, &follower)?;
            let b = resolve(store, &followed)?;
            let changed = store.follow(a.id, b.id)?;
            serde_json::to_value(EdgeChange {
                follower: &follower,
                followed: &followed,
                changed,
            })?
        }
        Command::Unfollow { follower, followed } => {
            let a = resolve(store, &follower)?;
            let b = resolve(store, &followed)?;
            let changed = store.unfollow(a.id, b.id)?;
            serde_json::to_value(EdgeChange {
                follower: &follower,
                followed: &followed,
                changed,
            })?
        }
        Command::Followed { username } => {
            let user = resolve(store, &username)?;
            let users = store.list_followed(user.id)?;
            serde_json::to_value(Neighbourhood {
                user,
                count: users.len(),
                users,
            })?
        }
        Command::Followers { username } => {
            let user = resolve(store, &username)?;
            let users = store.list_followers(user.id)?;
            serde_json::to_value(Neighbourhood {
                user,
                count: users.len(),
                users,
            })?
        }
        Command::Users { limit, offset } => {
            let users = store.list_users(limit, offset)?;
            serde_json::json!({
                "total": store.count_users()?,
                "users": users,
            })
        }
    };
    Ok(value)
}

fn resolve(store: &FollowStore, username: &str) -> Result<User> {
    store
        .find_user_by_username(username)?
        .ok_or_else(|| CliError::UnknownUser {
            username: username.to_string(),
        })
}
