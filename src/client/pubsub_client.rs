//! Client representation
//!
//! `Client` models one connected WebSocket client: the sending side of its
//! outbound channel plus the subscriptions it has open, keyed by the
//! operation id the client chose.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::warn;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::broker::CancelHandle;
use crate::transport::message::ServerMessage;

/// An open subscription: the handle that stops it and the task forwarding
/// its events. The operation id stays taken until the task has sent its
/// final `complete`.
#[derive(Debug)]
struct Operation {
    cancel: CancelHandle,
    forward: JoinHandle<()>,
}

impl Operation {
    fn is_finished(&self) -> bool {
        self.forward.is_finished()
    }
}

#[derive(Debug)]
pub struct Client {
    pub id: String,
    pub sender: UnboundedSender<WsMessage>,
    operations: HashMap<String, Operation>,
}

impl Client {
    /// Create a new client with a sender channel. The `id` is a UUID used
    /// to identify the client in logs.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            operations: HashMap::new(),
        }
    }

    /// Queue a message for the client. Returns `false` once the connection
    /// is gone.
    pub fn send(&self, message: &ServerMessage) -> bool {
        send(&self.sender, message)
    }

    /// Whether `operation_id` is still in use: its subscription is open, or
    /// it was cancelled and the forwarding task has not finished yet.
    pub fn is_tracking(&self, operation_id: &str) -> bool {
        self.operations
            .get(operation_id)
            .is_some_and(|operation| !operation.is_finished())
    }

    /// Record an open subscription under `operation_id`. Callers check
    /// `is_tracking` first; the id must be free.
    pub fn track(&mut self, operation_id: String, cancel: CancelHandle, forward: JoinHandle<()>) {
        debug_assert!(!self.is_tracking(&operation_id));
        self.operations.retain(|_, operation| !operation.is_finished());
        self.operations.insert(operation_id, Operation { cancel, forward });
    }

    /// Stop the subscription behind `operation_id`. The id remains reserved
    /// until its forwarding task ends. Returns `false` if nothing was open.
    pub fn cancel(&self, operation_id: &str) -> bool {
        self.operations
            .get(operation_id)
            .is_some_and(|operation| operation.cancel.cancel())
    }

    /// Number of operation ids currently in use.
    pub fn subscription_count(&self) -> usize {
        self.operations
            .values()
            .filter(|operation| !operation.is_finished())
            .count()
    }

    /// Cancel every open subscription, e.g. when the connection drops.
    pub fn cancel_all(&mut self) {
        for (_, operation) in self.operations.drain() {
            operation.cancel.cancel();
        }
    }
}

/// Serialize and queue `message` on a client channel.
pub fn send(sender: &UnboundedSender<WsMessage>, message: &ServerMessage) -> bool {
    let text = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize message: {e}");
            return false;
        }
    };
    sender.send(WsMessage::text(text)).is_ok()
}
