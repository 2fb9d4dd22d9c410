use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::timeout;

use super::Handlers;
use super::topics::{EventKind, parse_field, topic_name};
use crate::broker::{Broker, Filter, Subscription, SubscriptionArgs};
use crate::store::models::{CreateCommentInput, CreatePostInput, UpdatePostInput};
use crate::store::{Collection, Store};
use crate::utils::error::{Error, StoreError};

const COUNT_DELAY: Duration = Duration::from_millis(20);
const WAIT: Duration = Duration::from_secs(2);

fn handlers() -> Handlers {
    Handlers::new(Arc::new(Store::seeded()), Broker::new(), COUNT_DELAY)
}

fn args(value: Value) -> SubscriptionArgs {
    value.as_object().cloned().unwrap_or_default()
}

async fn next_payload(subscription: &mut Subscription) -> Value {
    timeout(WAIT, subscription.next())
        .await
        .expect("timed out waiting for payload")
        .expect("subscription ended")
        .payload
        .clone()
}

fn new_post(title: &str, user_id: &str) -> CreatePostInput {
    CreatePostInput {
        title: title.to_string(),
        user_id: user_id.to_string(),
    }
}

#[test]
fn test_topic_names() {
    assert_eq!(topic_name(Collection::Posts, EventKind::Created), "postCreated");
    assert_eq!(topic_name(Collection::Users, EventKind::Count), "userCount");
    assert_eq!(
        parse_field("commentDeleted"),
        Some((Collection::Comments, EventKind::Deleted))
    );
    assert_eq!(parse_field("postCreatedd"), None);
    assert_eq!(parse_field("bookCreated"), None);
}

#[tokio::test]
async fn test_create_publishes_full_record_and_count() {
    let handlers = handlers();
    let broker = handlers.broker().clone();
    let mut created = broker.subscribe("postCreated", Filter::All).unwrap();
    let mut count = broker.subscribe("postCount", Filter::All).unwrap();

    let post = handlers.create_post(new_post("fresh", "1")).unwrap();

    assert_eq!(next_payload(&mut created).await, serde_json::to_value(&post).unwrap());
    assert_eq!(next_payload(&mut count).await, json!(4));
}

#[tokio::test]
async fn test_update_publishes_merged_record() {
    let handlers = handlers();
    let mut updated = handlers
        .broker()
        .subscribe("postUpdated", Filter::All)
        .unwrap();

    handlers
        .update_post(
            "3",
            UpdatePostInput {
                title: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let payload = next_payload(&mut updated).await;
    assert_eq!(payload, json!({"id": "3", "title": "renamed", "user_id": "2"}));
}

#[tokio::test]
async fn test_delete_publishes_removed_record_and_count() {
    let handlers = handlers();
    let broker = handlers.broker().clone();
    let mut deleted = broker.subscribe("commentDeleted", Filter::All).unwrap();
    let mut count = broker.subscribe("commentCount", Filter::All).unwrap();

    let comment = handlers.delete_comment("4").unwrap();

    assert_eq!(comment.text, "Onur's second comment");
    assert_eq!(next_payload(&mut deleted).await["id"], "4");
    assert_eq!(next_payload(&mut count).await, json!(3));
}

#[tokio::test]
async fn test_missing_id_publishes_nothing() {
    let handlers = handlers();
    let updated = handlers
        .broker()
        .subscribe("userUpdated", Filter::All)
        .unwrap();

    let err = handlers
        .update_user("99", Default::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Store(StoreError::NotFound { entity: "user", .. })
    ));
    assert!(handlers.delete_user("99").is_err());
    assert_eq!(updated.pending(), 0);
}

#[tokio::test]
async fn test_delete_all_publishes_zero_count() {
    let handlers = handlers();
    let mut count = handlers
        .broker()
        .subscribe("userCount", Filter::All)
        .unwrap();

    let output = handlers.delete_all_users().unwrap();

    assert_eq!(output.count, 2);
    assert_eq!(next_payload(&mut count).await, json!(0));
}

#[tokio::test]
async fn test_post_created_filtered_by_user_id() {
    let handlers = handlers();
    let mut for_user_two = handlers
        .subscribe("postCreated", &args(json!({"user_id": "2"})))
        .unwrap();
    let mut everyone = handlers.subscribe("postCreated", &args(json!({}))).unwrap();

    handlers.create_post(new_post("by one", "1")).unwrap();
    handlers.create_post(new_post("by two", "2")).unwrap();

    assert_eq!(next_payload(&mut for_user_two).await["title"], "by two");
    assert!(for_user_two.try_next().is_none());

    assert_eq!(next_payload(&mut everyone).await["title"], "by one");
    assert_eq!(next_payload(&mut everyone).await["title"], "by two");
}

#[tokio::test]
async fn test_comment_created_null_argument_accepts_all() {
    let handlers = handlers();
    let mut subscription = handlers
        .subscribe("commentCreated", &args(json!({"post_id": null})))
        .unwrap();

    handlers
        .create_comment(CreateCommentInput {
            text: "hi".to_string(),
            post_id: "7".to_string(),
            user_id: "1".to_string(),
        })
        .unwrap();

    assert_eq!(next_payload(&mut subscription).await["post_id"], "7");
}

#[tokio::test]
async fn test_unknown_field_is_rejected() {
    let handlers = handlers();
    let err = handlers.subscribe("bookCreated", &args(json!({}))).unwrap_err();
    assert!(matches!(err, Error::UnknownSubscription(field) if field == "bookCreated"));
}

#[tokio::test]
async fn test_count_subscription_gets_initial_then_mutation_values() {
    let handlers = handlers();
    let mut count = handlers.subscribe("postCount", &args(json!({}))).unwrap();

    assert_eq!(next_payload(&mut count).await, json!(3));

    handlers.create_post(new_post("another", "2")).unwrap();
    assert_eq!(next_payload(&mut count).await, json!(4));

    handlers.delete_post("1").unwrap();
    assert_eq!(next_payload(&mut count).await, json!(3));
}

#[test]
fn test_concurrent_creates_publish_counts_in_commit_order() {
    let store = Arc::new(Store::new());
    let handlers = Handlers::new(Arc::clone(&store), Broker::new(), COUNT_DELAY);
    let mut count = handlers
        .broker()
        .subscribe("postCount", Filter::All)
        .unwrap();

    let writers: Vec<_> = (0..8)
        .map(|_| {
            let handlers = handlers.clone();
            std::thread::spawn(move || {
                for _ in 0..20 {
                    handlers.create_post(new_post("t", "1")).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let mut counts = Vec::new();
    while let Some(envelope) = count.try_next() {
        counts.push(envelope.payload.as_u64().unwrap() as usize);
    }
    assert_eq!(counts, (1..=160).collect::<Vec<_>>());
    assert_eq!(counts.last(), Some(&store.count(Collection::Posts)));
}
