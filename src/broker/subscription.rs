//! Subscription handles
//!
//! A `Subscription` is the consumer side of one subscriber: a FIFO of
//! envelopes that `next()` drains, suspending while the queue is empty.
//! Once the subscriber is closed and its backlog is drained, `next()`
//! returns `None` for good.
//!
//! Closing happens through `cancel()`, through a detached `CancelHandle`
//! (so another task can close a subscription whose consumer is parked in
//! `next()`), or by dropping the `Subscription`.

use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::broker::engine::{TopicIndex, is_registered, remove_subscriber};
use crate::broker::message::Envelope;
use crate::broker::topic::SubscriberId;

#[derive(Debug)]
pub struct Subscription {
    receiver: UnboundedReceiver<Arc<Envelope>>,
    handle: CancelHandle,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        topic: String,
        receiver: UnboundedReceiver<Arc<Envelope>>,
        topics: Weak<Mutex<TopicIndex>>,
    ) -> Self {
        Self {
            receiver,
            handle: CancelHandle { id, topic, topics },
        }
    }

    pub fn id(&self) -> &SubscriberId {
        &self.handle.id
    }

    pub fn topic(&self) -> &str {
        &self.handle.topic
    }

    /// Wait for the next envelope. Returns `None` once the subscription is
    /// closed and nothing is left to drain.
    pub async fn next(&mut self) -> Option<Arc<Envelope>> {
        self.receiver.recv().await
    }

    /// Take the oldest buffered envelope without waiting.
    pub fn try_next(&mut self) -> Option<Arc<Envelope>> {
        self.receiver.try_recv().ok()
    }

    /// Number of envelopes queued and not yet consumed.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }
}

impl Stream for Subscription {
    type Item = Arc<Envelope>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}

/// Closes a subscription from anywhere. Cancelling twice, or after the
/// broker is gone, is a no-op.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    id: SubscriberId,
    topic: String,
    topics: Weak<Mutex<TopicIndex>>,
}

impl CancelHandle {
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Returns `true` only for the call that actually closed the subscriber.
    pub fn cancel(&self) -> bool {
        match self.topics.upgrade() {
            Some(topics) => remove_subscriber(&topics, &self.topic, &self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.topics
            .upgrade()
            .is_some_and(|topics| is_registered(&topics, &self.topic, &self.id))
    }
}
