//! Error types shared across the crate.
//!
//! Each layer has its own enum (`BrokerError`, `StoreError`) so callers can
//! match on exactly what that layer can fail with; `Error` aggregates them
//! for the handler and transport layers.

use thiserror::Error;

/// Misuse of the broker API. Fatal to the call, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error("invalid topic name: {0:?}")]
    InvalidTopic(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown subscription field: {0}")]
    UnknownSubscription(String),

    #[error("operation id already in use: {0}")]
    DuplicateOperation(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
