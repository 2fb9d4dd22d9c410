//! Event envelopes
//!
//! An `Envelope` is what the broker fans out: the topic it was published to,
//! the payload handed to `publish`, and the publish time. Envelopes are
//! wrapped in an `Arc` once published so every subscriber shares the same
//! immutable value.
//!
//! Notes on fields:
//! - `topic`: topic name used for routing
//! - `payload`: the entity (or count) exactly as the publisher provided it
//! - `timestamp`: milliseconds since UNIX epoch; set by the broker upon publish

use chrono::Utc;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub topic: String,
    pub payload: Value,
    pub timestamp: i64,
}

impl Envelope {
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
