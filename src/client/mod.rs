//! The `client` module defines the per-connection state of a WebSocket
//! client: its outbound channel and the subscriptions it has open.

pub mod pubsub_client;
pub use pubsub_client::Client;

#[cfg(test)]
mod tests;
