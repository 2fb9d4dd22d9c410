//! WebSocket transport
//!
//! A small consumer surface over the handlers:
//! - accept TCP/WebSocket connections and create a `Client` for each
//! - translate JSON frames into queries, mutations and subscriptions
//! - drain every open subscription on its own task, forwarding each payload
//!   as a `next` frame and finishing with `complete`
//! - cancel all of a client's subscriptions when it disconnects

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{Subscription, SubscriptionArgs};
use crate::client::Client;
use crate::client::pubsub_client::send;
use crate::handlers::Handlers;
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::error::{Error, Result};

pub async fn start_websocket_server(addr: &str, handlers: Handlers) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, handlers).await
}

/// Accept connections on an already bound listener until accepting fails.
pub async fn serve(listener: TcpListener, handlers: Handlers) -> Result<()> {
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "accepted connection");
        spawn(handle_connection(stream, handlers.clone()));
    }
}

async fn handle_connection(stream: TcpStream, handlers: Handlers) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut client = Client::new(tx);
    let client_id = client.id.clone();
    info!(client = %client_id, "client connected");

    {
        let client_id = client_id.clone();
        spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    warn!("Failed to send message to {client_id}: {e}");
                    break;
                }
            }
            debug!("Send loop closed for {client_id}");
        });
    }

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => handle_message(&handlers, &mut client, text.as_str()),
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(client = %client_id, "WebSocket read error: {e}");
                break;
            }
        }
    }

    client.cancel_all();
    info!(client = %client_id, "client disconnected");
}

/// Handle one text frame from `client`. Must run inside a tokio runtime:
/// subscriptions are drained on spawned tasks.
pub fn handle_message(handlers: &Handlers, client: &mut Client, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Invalid client message: {e} | {text}");
            client.send(&ServerMessage::error(None, format!("invalid message: {e}")));
            return;
        }
    };

    match message {
        ClientMessage::Subscribe { id, field, args } => {
            if let Err(e) = subscribe(handlers, client, id.clone(), &field, &args) {
                client.send(&ServerMessage::error(Some(id), e.to_string()));
            }
        }
        ClientMessage::Unsubscribe { id } => {
            // The forwarding task sends `complete` once the stream ends.
            if client.cancel(&id) {
                debug!(client = %client.id, operation = %id, "unsubscribed");
            }
        }
        ClientMessage::Query { id, op } => reply(client, id, op.execute(handlers)),
        ClientMessage::Mutation { id, op } => reply(client, id, op.execute(handlers)),
    }
}

fn subscribe(
    handlers: &Handlers,
    client: &mut Client,
    id: String,
    field: &str,
    args: &SubscriptionArgs,
) -> Result<()> {
    if client.is_tracking(&id) {
        return Err(Error::DuplicateOperation(id));
    }

    let subscription = handlers.subscribe(field, args)?;
    let cancel = subscription.cancel_handle();
    let task = spawn(forward(id.clone(), subscription, client.sender.clone()));
    debug!(client = %client.id, operation = %id, field, "subscribed");

    client.track(id, cancel, task);
    Ok(())
}

async fn forward(id: String, mut subscription: Subscription, sender: UnboundedSender<WsMessage>) {
    while let Some(envelope) = subscription.next().await {
        debug!(
            operation = %id,
            topic = %envelope.topic,
            published_at = envelope.timestamp,
            "forwarding event"
        );
        let message = ServerMessage::Next {
            id: id.clone(),
            payload: envelope.payload.clone(),
        };
        if !send(&sender, &message) {
            return;
        }
    }
    send(&sender, &ServerMessage::Complete { id });
}

fn reply(client: &Client, id: String, result: Result<Value>) {
    let message = match result {
        Ok(data) => ServerMessage::Result { id, data },
        Err(e) => ServerMessage::error(Some(id), e.to_string()),
    };
    client.send(&message);
}
