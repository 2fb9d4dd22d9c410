//! Subscription catalog
//!
//! Maps a subscription field and the client's arguments onto a broker
//! subscription:
//! - `postCreated(user_id)` and `commentCreated(post_id)` filter on the
//!   argument of the same name; an absent argument accepts everything
//! - `<entity>Count` subscribes through the count poller so the client gets
//!   the current size shortly after attaching
//! - everything else is an unfiltered subscription to the field's topic

use std::sync::Arc;

use crate::broker::{Filter, Subscription, SubscriptionArgs};
use crate::handlers::Handlers;
use crate::handlers::topics::{EventKind, parse_field, topic_name};
use crate::store::Collection;
use crate::utils::error::{Error, Result};

/// Filter argument accepted by a subscription field, if any.
pub fn filter_argument(collection: Collection, kind: EventKind) -> Option<&'static str> {
    match (collection, kind) {
        (Collection::Posts, EventKind::Created) => Some("user_id"),
        (Collection::Comments, EventKind::Created) => Some("post_id"),
        _ => None,
    }
}

impl Handlers {
    /// Open a subscription for `field` (e.g. `postCreated`). Count fields
    /// must be subscribed from within a tokio runtime.
    pub fn subscribe(&self, field: &str, args: &SubscriptionArgs) -> Result<Subscription> {
        let (collection, kind) =
            parse_field(field).ok_or_else(|| Error::UnknownSubscription(field.to_string()))?;
        let topic = topic_name(collection, kind);

        let subscription = if kind == EventKind::Count {
            let store = Arc::clone(&self.store);
            self.poller.subscribe(&topic, move |publish| {
                store.with_count(collection, publish)
            })?
        } else {
            let filter = match filter_argument(collection, kind) {
                Some(argument) => Filter::by_argument(argument, args),
                None => Filter::All,
            };
            self.broker.subscribe(&topic, filter)?
        };

        Ok(subscription)
    }
}
