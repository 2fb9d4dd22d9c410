//! The broker module is the topic-addressed publish/subscribe core.
//!
//! - `engine`: the `Broker` topic index with publish/subscribe/unsubscribe
//! - `topic`: one topic's subscriber set and fan-out
//! - `filter`: per-subscriber predicates bound at subscribe time
//! - `subscription`: the consumer handle (`next()`, `cancel()`, `Stream`)
//! - `poller`: delayed initial publish for count topics

pub mod engine;
pub mod filter;
pub mod message;
pub mod poller;
pub mod subscription;
pub mod topic;

pub use engine::Broker;
pub use filter::{Filter, SubscriptionArgs};
pub use message::Envelope;
pub use poller::CountPoller;
pub use subscription::{CancelHandle, Subscription};
