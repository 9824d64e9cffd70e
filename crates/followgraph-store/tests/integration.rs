//! Integration tests for followgraph-store against real SQLite databases.
//!
//! Most tests use a private in-memory database; persistence tests use a
//! temporary file.

use std::sync::mpsc;

use followgraph_core::{EdgePolicy, EventPayload, StoreConfig, User, UserId};
use followgraph_store::{FollowStore, StoreError};

fn store() -> FollowStore {
    FollowStore::open_in_memory(EdgePolicy::Idempotent).unwrap()
}

fn ids(users: &[User]) -> Vec<UserId> {
    users.iter().map(|u| u.id).collect()
}

#[test]
fn test_follow_unfollow_scenario() {
    let store = store();
    let u1 = store.create_user("0001").unwrap();
    let u2 = store.create_user("0002").unwrap();

    assert!(store.list_followed(u1.id).unwrap().is_empty());
    assert!(store.list_followers(u2.id).unwrap().is_empty());

    assert!(store.follow(u1.id, u2.id).unwrap());
    assert_eq!(store.list_followed(u1.id).unwrap(), vec![u2.clone()]);
    assert_eq!(store.list_followers(u2.id).unwrap(), vec![u1.clone()]);

    assert!(store.unfollow(u1.id, u2.id).unwrap());
    assert!(store.list_followed(u1.id).unwrap().is_empty());
    assert!(store.list_followers(u2.id).unwrap().is_empty());
}

#[test]
fn test_follow_is_directed() {
    let store = store();
    let a = store.create_user("alice").unwrap();
    let b = store.create_user("bob").unwrap();

    store.follow(a.id, b.id).unwrap();

    assert!(store.is_following(a.id, b.id).unwrap());
    assert!(!store.is_following(b.id, a.id).unwrap());
    assert!(store.list_followed(b.id).unwrap().is_empty());
    assert!(store.list_followers(a.id).unwrap().is_empty());

    store.follow(b.id, a.id).unwrap();
    assert_eq!(ids(&store.list_followed(b.id).unwrap()), vec![a.id]);
}

#[test]
fn test_views_stay_consistent() {
    let store = store();
    let users: Vec<User> = (0..5)
        .map(|i| store.create_user(&format!("user-{i}")).unwrap())
        .collect();

    // A few arbitrary edges, including a self-follow.
    let edges = [(0, 1), (0, 2), (1, 2), (3, 0), (4, 4), (2, 0)];
    for (a, b) in edges {
        store.follow(users[a].id, users[b].id).unwrap();
    }
    store.unfollow(users[0].id, users[2].id).unwrap();

    for a in &users {
        for b in &users {
            let outbound = ids(&store.list_followed(a.id).unwrap()).contains(&b.id);
            let inbound = ids(&store.list_followers(b.id).unwrap()).contains(&a.id);
            assert_eq!(outbound, inbound, "mismatch for {} -> {}", a.username, b.username);
        }
    }
}

#[test]
fn test_unfollow_absent_edge_is_noop() {
    let store = store();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();
    let c = store.create_user("c").unwrap();
    store.follow(a.id, c.id).unwrap();

    assert!(!store.unfollow(a.id, b.id).unwrap());
    assert_eq!(ids(&store.list_followed(a.id).unwrap()), vec![c.id]);
    assert!(store.list_followers(b.id).unwrap().is_empty());
}

#[test]
fn test_duplicate_follow_idempotent() {
    let store = store();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();

    assert!(store.follow(a.id, b.id).unwrap());
    assert!(!store.follow(a.id, b.id).unwrap());

    assert_eq!(store.count_followed(a.id).unwrap(), 1);
    assert_eq!(store.list_followers(b.id).unwrap().len(), 1);
}

#[test]
fn test_duplicate_follow_rejected() {
    let store = FollowStore::open_in_memory(EdgePolicy::Reject).unwrap();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();

    store.follow(a.id, b.id).unwrap();
    let err = store.follow(a.id, b.id).unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateEdge { follower_id, followed_id }
            if follower_id == a.id && followed_id == b.id
    ));
    assert_eq!(store.count_followers(b.id).unwrap(), 1);
}

#[test]
fn test_duplicate_username_rejected() {
    let store = store();
    store.create_user("0001").unwrap();

    let err = store.create_user("0001").unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert_eq!(store.count_users().unwrap(), 1);
}

#[test]
fn test_username_length_rejected() {
    let store = store();

    assert!(matches!(
        store.create_user(""),
        Err(StoreError::ConstraintViolation(_))
    ));
    assert!(matches!(
        store.create_user(&"x".repeat(51)),
        Err(StoreError::ConstraintViolation(_))
    ));
    assert!(store.create_user(&"x".repeat(50)).is_ok());
}

#[test]
fn test_follow_missing_user() {
    let store = store();
    let a = store.create_user("a").unwrap();
    let ghost = UserId(999);

    let err = store.follow(a.id, ghost).unwrap_err();
    assert!(matches!(err, StoreError::ReferentialError { user_id } if user_id == ghost));

    let err = store.follow(ghost, a.id).unwrap_err();
    assert!(matches!(err, StoreError::ReferentialError { user_id } if user_id == ghost));

    assert!(store.list_followed(a.id).unwrap().is_empty());
}

#[test]
fn test_self_follow_allowed() {
    let store = store();
    let a = store.create_user("narcissus").unwrap();

    store.follow(a.id, a.id).unwrap();
    assert_eq!(ids(&store.list_followed(a.id).unwrap()), vec![a.id]);
    assert_eq!(ids(&store.list_followers(a.id).unwrap()), vec![a.id]);
    let edges = store.list_edges(a.id).unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].follower_id, edges[0].followed_id);
}

#[test]
fn test_delete_user_cascades_edges() {
    let store = store();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();
    let c = store.create_user("c").unwrap();
    store.follow(a.id, b.id).unwrap();
    store.follow(b.id, c.id).unwrap();
    store.follow(c.id, a.id).unwrap();

    assert!(store.delete_user(b.id).unwrap());

    assert!(store.list_followed(a.id).unwrap().is_empty());
    assert!(store.list_followers(c.id).unwrap().is_empty());
    assert_eq!(ids(&store.list_followed(c.id).unwrap()), vec![a.id]);
    assert!(matches!(
        store.get_user(b.id),
        Err(StoreError::NotFound { id }) if id == b.id
    ));

    assert!(!store.delete_user(b.id).unwrap());
}

#[test]
fn test_follow_many_is_atomic() {
    let store = FollowStore::open_in_memory(EdgePolicy::Reject).unwrap();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();
    let c = store.create_user("c").unwrap();

    assert_eq!(store.follow_many(a.id, &[b.id, c.id]).unwrap(), 2);
    assert_eq!(ids(&store.list_followed(a.id).unwrap()), vec![b.id, c.id]);

    // One bad target rolls back the whole batch.
    let d = store.create_user("d").unwrap();
    let err = store.follow_many(a.id, &[d.id, UserId(404)]).unwrap_err();
    assert!(matches!(err, StoreError::ReferentialError { .. }));
    assert!(!store.is_following(a.id, d.id).unwrap());

    // A duplicate under the reject policy also rolls back.
    let err = store.follow_many(a.id, &[d.id, b.id]).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEdge { .. }));
    assert!(!store.is_following(a.id, d.id).unwrap());
}

#[test]
fn test_lookup_and_listing() {
    let store = store();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();
    let c = store.create_user("c").unwrap();

    assert_eq!(store.get_user(a.id).unwrap(), a);
    assert_eq!(store.find_user_by_username("b").unwrap(), Some(b.clone()));
    assert_eq!(store.find_user_by_username("zzz").unwrap(), None);

    assert_eq!(store.count_users().unwrap(), 3);
    assert_eq!(ids(&store.list_users(2, 0).unwrap()), vec![a.id, b.id]);
    assert_eq!(ids(&store.list_users(2, 2).unwrap()), vec![c.id]);
}

#[test]
fn test_events_emitted_after_commit() {
    let (tx, rx) = mpsc::channel();
    let store = store().with_event_sink(tx);

    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();
    store.follow(a.id, b.id).unwrap();
    store.follow(a.id, b.id).unwrap(); // no-op, no event
    store.unfollow(a.id, b.id).unwrap();
    store.unfollow(a.id, b.id).unwrap(); // no-op, no event
    store.delete_user(b.id).unwrap();

    let payloads: Vec<EventPayload> = rx.try_iter().map(|e| e.payload).collect();
    assert_eq!(
        payloads,
        vec![
            EventPayload::UserCreated {
                user_id: a.id,
                username: "a".to_string()
            },
            EventPayload::UserCreated {
                user_id: b.id,
                username: "b".to_string()
            },
            EventPayload::Followed {
                follower_id: a.id,
                followed_id: b.id
            },
            EventPayload::Unfollowed {
                follower_id: a.id,
                followed_id: b.id
            },
            EventPayload::UserDeleted {
                user_id: b.id,
                username: "b".to_string(),
                edges_removed: 0
            },
        ]
    );
}

#[test]
fn test_failed_mutation_emits_nothing() {
    let (tx, rx) = mpsc::channel();
    let store = FollowStore::open_in_memory(EdgePolicy::Reject)
        .unwrap()
        .with_event_sink(tx);
    let a = store.create_user("a").unwrap();
    let _ = rx.try_iter().count();

    assert!(store.create_user("a").is_err());
    assert!(store.follow(a.id, UserId(77)).is_err());
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        database_path: dir.path().join("graph.db"),
        ..Default::default()
    };

    let (a, b) = {
        let store = FollowStore::open(&config).unwrap();
        let a = store.create_user("0001").unwrap();
        let b = store.create_user("0002").unwrap();
        store.follow(a.id, b.id).unwrap();
        (a, b)
    };

    let store = FollowStore::open(&config).unwrap();
    assert_eq!(store.get_user(a.id).unwrap().username, "0001");
    assert_eq!(ids(&store.list_followers(b.id).unwrap()), vec![a.id]);
}

#[test]
fn test_shared_across_threads() {
    let store = store();
    let hub = store.create_user("hub").unwrap().id;

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let u = store.create_user(&format!("spoke-{i}")).unwrap();
                store.follow(u.id, hub).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.count_followers(hub).unwrap(), 4);
}

#[test]
fn test_follow_many_repeated_target_counts_once() {
    let store = store();
    let a = store.create_user("a").unwrap();
    let b = store.create_user("b").unwrap();

    assert_eq!(store.follow_many(a.id, &[b.id, b.id]).unwrap(), 1);
    assert_eq!(store.count_followers(b.id).unwrap(), 1);
}
