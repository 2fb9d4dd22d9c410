use std::sync::{Arc, Mutex};
use std::thread;

use super::models::{CreatePostInput, CreateUserInput, UpdateCommentInput, UpdateUserInput};
use super::{Collection, Store};
use crate::utils::error::StoreError;

#[test]
fn test_seeded_store_counts() {
    let store = Store::seeded();
    assert_eq!(store.count(Collection::Users), 2);
    assert_eq!(store.count(Collection::Posts), 3);
    assert_eq!(store.count(Collection::Comments), 4);
}

#[test]
fn test_new_store_is_empty() {
    let store = Store::new();
    for collection in Collection::ALL {
        assert_eq!(store.count(collection), 0);
    }
}

#[test]
fn test_create_assigns_fresh_id_and_reports_count() {
    let store = Store::seeded();
    let new_post = |title: &str| CreatePostInput {
        title: title.to_string(),
        user_id: "1".to_string(),
    };
    let first = store.create_post(new_post("hello"), |committed| committed);
    let second = store.create_post(new_post("again"), |committed| committed);

    assert_ne!(first.record.id, second.record.id);
    assert_eq!(first.count, 4);
    assert_eq!(second.count, 5);
    assert_eq!(store.post(&first.record.id).unwrap().title, "hello");
}

#[test]
fn test_update_merges_partial_patch() {
    let store = Store::seeded();
    let updated = store
        .update_user(
            "1",
            UpdateUserInput {
                age: Some(30),
                ..Default::default()
            },
            |user| user,
        )
        .unwrap();

    assert_eq!(updated.full_name, "Onur Aylanc");
    assert_eq!(updated.age, 30);
    assert_eq!(store.user("1").unwrap(), updated);
}

#[test]
fn test_update_missing_id_is_not_found() {
    let store = Store::seeded();
    let err = store
        .update_comment("404", UpdateCommentInput::default(), |_| ())
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            entity: "comment",
            id: "404".to_string()
        }
    );
}

#[test]
fn test_delete_returns_record_as_it_was() {
    let store = Store::seeded();
    let deleted = store.delete_post("2", |committed| committed).unwrap();

    assert_eq!(deleted.record.title, "Aylanc's post");
    assert_eq!(deleted.count, 2);
    assert!(store.post("2").is_err());
    assert!(store.delete_post("2", |_| ()).is_err());
}

#[test]
fn test_delete_all_reports_removed() {
    let store = Store::seeded();
    assert_eq!(store.delete_all_comments(|removed| removed), 4);
    assert_eq!(store.count(Collection::Comments), 0);
    assert_eq!(store.delete_all_comments(|removed| removed), 0);
}

#[test]
fn test_relations() {
    let store = Store::seeded();
    let ids = |posts: Vec<super::Post>| posts.into_iter().map(|p| p.id).collect::<Vec<_>>();

    assert_eq!(ids(store.posts_by_user("2")), vec!["2", "3"]);
    assert_eq!(store.comments_by_post("1").len(), 2);
    assert_eq!(store.comments_by_user("1").len(), 2);
    assert!(store.posts_by_user("nobody").is_empty());
}

#[test]
fn test_user_serializes_with_demo_field_names() {
    let store = Store::new();
    let user = store
        .create_user(
            CreateUserInput {
                full_name: "Ada".to_string(),
                age: 36,
            },
            |committed| committed,
        )
        .record;

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["fullName"], "Ada");
    assert_eq!(json["age"], 36);
    assert!(json.get("full_name").is_none());
}

#[test]
fn test_commit_callbacks_run_in_commit_order() {
    let store = Arc::new(Store::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for _ in 0..50 {
                    let input = CreatePostInput {
                        title: "t".to_string(),
                        user_id: "1".to_string(),
                    };
                    store.create_post(input, |committed| {
                        seen.lock().unwrap().push(committed.count);
                    });
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    // Callbacks never interleave with other writes, so they observe
    // strictly increasing sizes.
    assert_eq!(*seen.lock().unwrap(), (1..=200).collect::<Vec<_>>());
    assert_eq!(store.count(Collection::Posts), 200);
}
