//! Handlers tie the store to the broker.
//!
//! Mutations change the store and then publish the affected record (and,
//! for size-changing operations, the new count). Queries read the store.
//! Subscriptions map a subscription field plus client arguments onto a
//! broker topic and filter.
//!
//! `Handlers` is the context object the transport layer is given; it is
//! cheap to clone.

pub mod mutations;
pub mod queries;
pub mod subscriptions;
pub mod topics;

use std::sync::Arc;
use std::time::Duration;

use crate::broker::{Broker, CountPoller};
use crate::config::BrokerSettings;
use crate::store::Store;

pub use mutations::DeleteAllOutput;
pub use topics::{EventKind, topic_name};

#[derive(Debug, Clone)]
pub struct Handlers {
    store: Arc<Store>,
    broker: Broker,
    poller: CountPoller,
}

impl Handlers {
    pub fn new(store: Arc<Store>, broker: Broker, count_delay: Duration) -> Self {
        let poller = CountPoller::new(broker.clone(), count_delay);
        Self {
            store,
            broker,
            poller,
        }
    }

    pub fn from_settings(store: Arc<Store>, broker: Broker, settings: &BrokerSettings) -> Self {
        Self::new(
            store,
            broker,
            Duration::from_millis(settings.count_delay_ms),
        )
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }
}

#[cfg(test)]
mod tests;
