//! The `transport` module is the network-facing consumer surface.
//!
//! It defines the JSON messaging protocol used between clients and the
//! server and implements the WebSocket server that maps client requests
//! onto the handlers and streams subscription events back.

pub mod message;
pub mod operations;
pub mod websocket;
