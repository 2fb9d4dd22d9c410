//! Dispatch of query and mutation operations onto `Handlers`.

use serde::Serialize;
use serde_json::Value;

use crate::handlers::Handlers;
use crate::transport::message::{MutationOp, QueryOp};
use crate::utils::error::Result;

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

impl QueryOp {
    pub fn execute(self, handlers: &Handlers) -> Result<Value> {
        match self {
            QueryOp::Users => to_value(handlers.users()),
            QueryOp::User { id } => to_value(handlers.user(&id)?),
            QueryOp::UserPosts { id } => to_value(handlers.user_posts(&id)?),
            QueryOp::UserComments { id } => to_value(handlers.user_comments(&id)?),
            QueryOp::Posts => to_value(handlers.posts()),
            QueryOp::Post { id } => to_value(handlers.post(&id)?),
            QueryOp::PostComments { id } => to_value(handlers.post_comments(&id)?),
            QueryOp::Comments => to_value(handlers.comments()),
            QueryOp::Comment { id } => to_value(handlers.comment(&id)?),
        }
    }
}

impl MutationOp {
    pub fn execute(self, handlers: &Handlers) -> Result<Value> {
        match self {
            MutationOp::CreateUser { data } => to_value(handlers.create_user(data)?),
            MutationOp::UpdateUser { id, data } => to_value(handlers.update_user(&id, data)?),
            MutationOp::DeleteUser { id } => to_value(handlers.delete_user(&id)?),
            MutationOp::DeleteAllUsers => to_value(handlers.delete_all_users()?),
            MutationOp::CreatePost { data } => to_value(handlers.create_post(data)?),
            MutationOp::UpdatePost { id, data } => to_value(handlers.update_post(&id, data)?),
            MutationOp::DeletePost { id } => to_value(handlers.delete_post(&id)?),
            MutationOp::DeleteAllPosts => to_value(handlers.delete_all_posts()?),
            MutationOp::CreateComment { data } => to_value(handlers.create_comment(data)?),
            MutationOp::UpdateComment { id, data } => {
                to_value(handlers.update_comment(&id, data)?)
            }
            MutationOp::DeleteComment { id } => to_value(handlers.delete_comment(&id)?),
            MutationOp::DeleteAllComments => to_value(handlers.delete_all_comments()?),
        }
    }
}
