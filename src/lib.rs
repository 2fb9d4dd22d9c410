//! # eventsub
//!
//! `eventsub` is an in-memory event notification broker for live
//! subscriptions over a small CRUD dataset. Mutation handlers publish the
//! records they create, update or delete; subscribers receive a filtered,
//! ordered stream of those events over WebSockets.
//!
//! ## Core Modules
//!
//! - `broker`: topic index, per-subscriber filtering, subscription handles and the count poller.
//! - `store`: the owned, internally synchronized users/posts/comments store.
//! - `handlers`: mutations that publish, queries, and the subscription catalog.
//! - `client`: per-connection state of a WebSocket client.
//! - `transport`: the JSON wire protocol and the WebSocket server.
//! - `config`: loading and merging server configuration.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod handlers;
pub mod store;
pub mod transport;
pub mod utils;

pub use broker::{Broker, CancelHandle, CountPoller, Envelope, Filter, Subscription};
pub use utils::error::{Error, Result};
