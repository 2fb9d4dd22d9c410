//! Wire protocol
//!
//! Every frame is a JSON object tagged by `type`. Clients pick an operation
//! `id` per request; the server echoes it on every reply so a client can
//! multiplex several subscriptions over one connection.
//!
//! Client → server:
//! - `subscribe { id, field, args? }`
//! - `unsubscribe { id }`
//! - `query { id, op }` / `mutation { id, op }`, where `op` is tagged by `name`
//!
//! Server → client:
//! - `next { id, payload }` for each delivered event
//! - `complete { id }` when a subscription stream ends
//! - `result { id, data }` for queries and mutations
//! - `error { id?, message }`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::broker::SubscriptionArgs;
use crate::store::models::{
    CreateCommentInput, CreatePostInput, CreateUserInput, UpdateCommentInput, UpdatePostInput,
    UpdateUserInput,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        id: String,
        field: String,
        #[serde(default)]
        args: SubscriptionArgs,
    },
    Unsubscribe {
        id: String,
    },
    Query {
        id: String,
        op: QueryOp,
    },
    Mutation {
        id: String,
        op: MutationOp,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum QueryOp {
    Users,
    User { id: String },
    UserPosts { id: String },
    UserComments { id: String },
    Posts,
    Post { id: String },
    PostComments { id: String },
    Comments,
    Comment { id: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum MutationOp {
    CreateUser { data: CreateUserInput },
    UpdateUser { id: String, data: UpdateUserInput },
    DeleteUser { id: String },
    DeleteAllUsers,
    CreatePost { data: CreatePostInput },
    UpdatePost { id: String, data: UpdatePostInput },
    DeletePost { id: String },
    DeleteAllPosts,
    CreateComment { data: CreateCommentInput },
    UpdateComment { id: String, data: UpdateCommentInput },
    DeleteComment { id: String },
    DeleteAllComments,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Next {
        id: String,
        payload: Value,
    },
    Complete {
        id: String,
    },
    Result {
        id: String,
        data: Value,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(id: Option<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            id,
            message: message.into(),
        }
    }
}
