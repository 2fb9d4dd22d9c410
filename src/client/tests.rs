use std::time::Duration;

use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tungstenite::protocol::Message as WsMessage;

use super::pubsub_client::Client;
use crate::broker::{Broker, Filter};
use crate::transport::message::ServerMessage;

#[test]
fn test_client_new() {
    let (tx, _) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx);
    assert!(!client.id.is_empty());
    assert_eq!(client.subscription_count(), 0);
}

#[test]
fn test_client_send_serializes_json() {
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx);

    assert!(client.send(&ServerMessage::Complete {
        id: "op".to_string()
    }));

    let frame = rx.try_recv().unwrap();
    let value: serde_json::Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
    assert_eq!(value, json!({"type": "complete", "id": "op"}));
}

#[test]
fn test_client_send_after_disconnect() {
    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx);
    drop(rx);
    assert!(!client.send(&ServerMessage::Complete {
        id: "op".to_string()
    }));
}

fn idle_task() -> JoinHandle<()> {
    tokio::spawn(std::future::pending())
}

#[tokio::test]
async fn test_client_keeps_id_reserved_until_forwarding_ends() {
    let broker = Broker::new();
    let (tx, _rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut client = Client::new(tx);
    let subscription = broker.subscribe("postCreated", Filter::All).unwrap();
    let (finish, finished) = oneshot::channel::<()>();
    let forward = tokio::spawn(async move {
        let _ = finished.await;
    });

    client.track("a".to_string(), subscription.cancel_handle(), forward);
    assert!(client.is_tracking("a"));

    assert!(client.cancel("a"));
    assert!(!client.cancel("a"));
    assert_eq!(broker.subscriber_count("postCreated"), 0);
    // The forwarding task is still running, so the id stays taken.
    assert!(client.is_tracking("a"));
    assert_eq!(client.subscription_count(), 1);

    finish.send(()).unwrap();
    timeout(Duration::from_secs(2), async {
        while client.is_tracking("a") {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("forwarding task did not finish");
    assert_eq!(client.subscription_count(), 0);
    assert!(!client.cancel("missing"));
}

#[tokio::test]
async fn test_client_cancel_all() {
    let broker = Broker::new();
    let (tx, _rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut client = Client::new(tx);
    let a = broker.subscribe("userCreated", Filter::All).unwrap();
    let b = broker.subscribe("userDeleted", Filter::All).unwrap();
    client.track("a".to_string(), a.cancel_handle(), idle_task());
    client.track("b".to_string(), b.cancel_handle(), idle_task());

    client.cancel_all();

    assert_eq!(client.subscription_count(), 0);
    assert_eq!(broker.subscriber_count("userCreated"), 0);
    assert_eq!(broker.subscriber_count("userDeleted"), 0);
}
