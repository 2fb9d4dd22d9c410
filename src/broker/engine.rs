//! Broker engine
//!
//! This module contains the in-memory broker responsible for:
//! - managing topics and their subscriber lists
//! - fanning published payloads out to every subscriber whose filter accepts them
//! - closing subscribers on unsubscribe so blocked consumers see end-of-stream
//!
//! Concurrency and usage notes:
//! - `Broker` is cheap to clone; clones share one topic index guarded by a
//!   single mutex. Publishers and subscribers may call in from any task.
//! - The lock is held only for index updates and non-blocking queue sends,
//!   never across an `.await`, so a slow consumer cannot stall a publisher.
//! - Topics are created lazily on first publish or subscribe and are never
//!   removed, only emptied.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::broker::filter::Filter;
use crate::broker::message::Envelope;
use crate::broker::subscription::Subscription;
use crate::broker::topic::{Subscriber, SubscriberId, Topic};
use crate::utils::error::BrokerError;

pub(crate) type TopicIndex = HashMap<String, Topic>;

#[derive(Debug, Clone, Default)]
pub struct Broker {
    topics: Arc<Mutex<TopicIndex>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber on `topic`. Only payloads published after
    /// this call returns, and accepted by `filter`, reach the subscription.
    pub fn subscribe(&self, topic: &str, filter: Filter) -> Result<Subscription, BrokerError> {
        let name = validate_topic(topic)?;
        let id: SubscriberId = Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::unbounded_channel();

        lock(&self.topics)
            .entry(name.to_string())
            .or_insert_with(|| Topic::new(name))
            .subscribe(id.clone(), Subscriber::new(filter, sender));

        debug!(topic = name, subscriber = %id, "subscribed");

        Ok(Subscription::new(
            id,
            name.to_string(),
            receiver,
            Arc::downgrade(&self.topics),
        ))
    }

    /// Publish `payload` to every matching subscriber of `topic` and return
    /// how many subscribers it was delivered to. Publishing to a topic with
    /// no subscribers drops the payload.
    pub fn publish(&self, topic: &str, payload: Value) -> Result<usize, BrokerError> {
        let name = validate_topic(topic)?;
        let envelope = Arc::new(Envelope::new(name, payload));

        let delivered = lock(&self.topics)
            .entry(name.to_string())
            .or_insert_with(|| Topic::new(name))
            .deliver(&envelope);

        trace!(topic = name, delivered, "published");
        Ok(delivered)
    }

    /// Close a subscriber and remove it from `topic`. Unknown or already
    /// removed subscribers are ignored.
    pub fn unsubscribe(&self, topic: &str, id: &SubscriberId) -> bool {
        remove_subscriber(&self.topics, topic, id)
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        lock(&self.topics).get(topic).map_or(0, Topic::len)
    }

    /// Names of every topic seen so far, including ones with no subscribers left.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.topics).keys().cloned().collect();
        names.sort();
        names
    }
}

fn validate_topic(topic: &str) -> Result<&str, BrokerError> {
    if topic.trim().is_empty() {
        return Err(BrokerError::InvalidTopic(topic.to_string()));
    }
    Ok(topic)
}

// A panicking filter must not take the whole broker down with it.
pub(crate) fn lock(topics: &Mutex<TopicIndex>) -> MutexGuard<'_, TopicIndex> {
    topics.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn remove_subscriber(topics: &Mutex<TopicIndex>, topic: &str, id: &SubscriberId) -> bool {
    let removed = lock(topics)
        .get_mut(topic)
        .is_some_and(|t| t.unsubscribe(id));

    if removed {
        debug!(topic, subscriber = %id, "unsubscribed");
    }
    removed
}

pub(crate) fn is_registered(topics: &Mutex<TopicIndex>, topic: &str, id: &SubscriberId) -> bool {
    lock(topics).get(topic).is_some_and(|t| t.contains(id))
}
