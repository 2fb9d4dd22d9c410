//! Topic management
//!
//! A `Topic` holds the active subscribers registered under one topic name.
//! Each subscriber owns the sending half of an unbounded queue plus the
//! filter bound at subscribe time; the matching receiver lives in the
//! subscriber's `Subscription` handle.
//!
//! Concurrency note: callers must synchronize access to `Topic` (the broker
//! keeps every topic behind its index lock).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::broker::filter::Filter;
use crate::broker::message::Envelope;

pub type SubscriberId = String;

#[derive(Debug)]
pub struct Subscriber {
    filter: Filter,
    sender: UnboundedSender<Arc<Envelope>>,
}

impl Subscriber {
    pub fn new(filter: Filter, sender: UnboundedSender<Arc<Envelope>>) -> Self {
        Self { filter, sender }
    }
}

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    subscribers: HashMap<SubscriberId, Subscriber>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Register a subscriber. Re-using an id replaces the previous entry.
    pub fn subscribe(&mut self, id: SubscriberId, subscriber: Subscriber) {
        self.subscribers.insert(id, subscriber);
    }

    /// Remove a subscriber, dropping its queue sender. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Enqueue `envelope` for every subscriber whose filter accepts it and
    /// return how many received it. Subscribers whose receiving side is gone
    /// are pruned on the way.
    pub fn deliver(&mut self, envelope: &Arc<Envelope>) -> usize {
        let mut delivered = 0;
        let topic = &self.name;

        self.subscribers.retain(|id, subscriber| {
            if subscriber.sender.is_closed() {
                debug!(topic = %topic, subscriber = %id, "pruning closed subscriber");
                return false;
            }
            if !subscriber.filter.accepts(&envelope.payload) {
                return true;
            }
            match subscriber.sender.send(Arc::clone(envelope)) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    debug!(topic = %topic, subscriber = %id, "pruning closed subscriber");
                    false
                }
            }
        });

        delivered
    }
}
