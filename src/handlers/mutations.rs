//! Mutation handlers
//!
//! Every mutation commits to the store and publishes before the store lock
//! is released, so concurrent mutations publish in commit order:
//! - create/update/delete publish the full record to
//!   `<entity>Created|Updated|Deleted` (delete publishes the record as it was
//!   just before removal)
//! - operations that change a collection's size also publish the new size to
//!   `<entity>Count`
//!
//! A missing id fails the mutation with `NotFound` and publishes nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::handlers::Handlers;
use crate::handlers::topics::{EventKind, topic_name};
use crate::store::models::{
    CreateCommentInput, CreatePostInput, CreateUserInput, UpdateCommentInput, UpdatePostInput,
    UpdateUserInput,
};
use crate::store::{Collection, Comment, Committed, Post, Record, User};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAllOutput {
    pub count: usize,
}

impl Handlers {
    pub fn create_user(&self, input: CreateUserInput) -> Result<User> {
        self.store.create_user(input, |committed| self.created(committed))
    }

    pub fn update_user(&self, id: &str, input: UpdateUserInput) -> Result<User> {
        self.store.update_user(id, input, |user| self.updated(user))?
    }

    pub fn delete_user(&self, id: &str) -> Result<User> {
        self.store.delete_user(id, |committed| self.deleted(committed))?
    }

    pub fn delete_all_users(&self) -> Result<DeleteAllOutput> {
        self.store.delete_all_users(|count| self.cleared(Collection::Users, count))
    }

    pub fn create_post(&self, input: CreatePostInput) -> Result<Post> {
        self.store.create_post(input, |committed| self.created(committed))
    }

    pub fn update_post(&self, id: &str, input: UpdatePostInput) -> Result<Post> {
        self.store.update_post(id, input, |post| self.updated(post))?
    }

    pub fn delete_post(&self, id: &str) -> Result<Post> {
        self.store.delete_post(id, |committed| self.deleted(committed))?
    }

    pub fn delete_all_posts(&self) -> Result<DeleteAllOutput> {
        self.store.delete_all_posts(|count| self.cleared(Collection::Posts, count))
    }

    pub fn create_comment(&self, input: CreateCommentInput) -> Result<Comment> {
        self.store.create_comment(input, |committed| self.created(committed))
    }

    pub fn update_comment(&self, id: &str, input: UpdateCommentInput) -> Result<Comment> {
        self.store.update_comment(id, input, |comment| self.updated(comment))?
    }

    pub fn delete_comment(&self, id: &str) -> Result<Comment> {
        self.store.delete_comment(id, |committed| self.deleted(committed))?
    }

    pub fn delete_all_comments(&self) -> Result<DeleteAllOutput> {
        self.store.delete_all_comments(|count| self.cleared(Collection::Comments, count))
    }

    // The helpers below run inside the store's commit callback.

    fn created<T: Record + Serialize>(&self, committed: Committed<T>) -> Result<T> {
        let Committed { record, count } = committed;
        info!(id = %record.id(), entity = T::COLLECTION.entity(), "created");
        self.emit(T::COLLECTION, EventKind::Created, &record)?;
        self.emit_count(T::COLLECTION, count)?;
        Ok(record)
    }

    fn updated<T: Record + Serialize>(&self, record: T) -> Result<T> {
        self.emit(T::COLLECTION, EventKind::Updated, &record)?;
        Ok(record)
    }

    fn deleted<T: Record + Serialize>(&self, committed: Committed<T>) -> Result<T> {
        let Committed { record, count } = committed;
        info!(id = %record.id(), entity = T::COLLECTION.entity(), "deleted");
        self.emit(T::COLLECTION, EventKind::Deleted, &record)?;
        self.emit_count(T::COLLECTION, count)?;
        Ok(record)
    }

    fn cleared(&self, collection: Collection, count: usize) -> Result<DeleteAllOutput> {
        info!(count, entity = collection.entity(), "all deleted");
        self.emit_count(collection, 0)?;
        Ok(DeleteAllOutput { count })
    }

    fn emit<T: Serialize>(&self, collection: Collection, kind: EventKind, record: &T) -> Result<()> {
        let payload = serde_json::to_value(record)?;
        self.broker.publish(&topic_name(collection, kind), payload)?;
        Ok(())
    }

    fn emit_count(&self, collection: Collection, count: usize) -> Result<()> {
        self.broker.publish(
            &topic_name(collection, EventKind::Count),
            Value::from(count),
        )?;
        Ok(())
    }
}
