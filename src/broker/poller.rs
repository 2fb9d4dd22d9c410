//! Count poller
//!
//! Count topics (`postCount`, `userCount`, ...) carry the current size of a
//! collection. A freshly attached subscriber should not have to wait for the
//! next mutation to learn the value, so subscribing through the poller also
//! schedules a one-shot publish of the current count after a short delay.
//! The count is read and published by a caller-supplied callback so the
//! caller can hold whatever lock guards the counted collection.
//!
//! The delayed publish goes through the regular broker fan-out. The timer is
//! not tied to the subscription: if the subscriber is gone by the time it
//! fires, the publish simply reaches nobody.

use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::broker::engine::Broker;
use crate::broker::filter::Filter;
use crate::broker::subscription::Subscription;
use crate::utils::error::BrokerError;

/// Publishes one count to the poller's topic and returns how many
/// subscribers it reached.
pub type PublishCount<'a> = &'a dyn Fn(usize) -> Result<usize, BrokerError>;

#[derive(Debug, Clone)]
pub struct CountPoller {
    broker: Broker,
    delay: Duration,
}

impl CountPoller {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(broker: Broker, delay: Duration) -> Self {
        Self { broker, delay }
    }

    /// Subscribe to `topic` and schedule the initial count publish.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, topic: &str, publish_current: F) -> Result<Subscription, BrokerError>
    where
        F: FnOnce(PublishCount<'_>) -> Result<usize, BrokerError> + Send + 'static,
    {
        let subscription = self.broker.subscribe(topic, Filter::All)?;
        self.schedule(topic, publish_current);
        Ok(subscription)
    }

    /// After the delay, call `publish_current` with a publisher for `topic`.
    /// The callback reads the count and publishes it in one step, so the
    /// value cannot be overtaken by a concurrent change to the source.
    pub fn schedule<F>(&self, topic: &str, publish_current: F) -> JoinHandle<()>
    where
        F: FnOnce(PublishCount<'_>) -> Result<usize, BrokerError> + Send + 'static,
    {
        let broker = self.broker.clone();
        let topic = topic.to_string();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let publish = |value: usize| {
                debug!(topic = %topic, value, "publishing initial count");
                broker.publish(&topic, Value::from(value))
            };
            match publish_current(&publish) {
                Ok(delivered) => debug!(topic = %topic, delivered, "published initial count"),
                Err(e) => warn!(topic = %topic, "failed to publish initial count: {e}"),
            }
        })
    }
}
