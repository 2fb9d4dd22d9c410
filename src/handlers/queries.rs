//! Read-only handlers. These never publish.

use crate::handlers::Handlers;
use crate::store::{Comment, Post, User};
use crate::utils::error::Result;

impl Handlers {
    pub fn users(&self) -> Vec<User> {
        self.store.users()
    }

    pub fn user(&self, id: &str) -> Result<User> {
        Ok(self.store.user(id)?)
    }

    pub fn posts(&self) -> Vec<Post> {
        self.store.posts()
    }

    pub fn post(&self, id: &str) -> Result<Post> {
        Ok(self.store.post(id)?)
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.store.comments()
    }

    pub fn comment(&self, id: &str) -> Result<Comment> {
        Ok(self.store.comment(id)?)
    }

    /// Posts written by `user_id`. Fails if the user does not exist.
    pub fn user_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        self.store.user(user_id)?;
        Ok(self.store.posts_by_user(user_id))
    }

    /// Comments written by `user_id`. Fails if the user does not exist.
    pub fn user_comments(&self, user_id: &str) -> Result<Vec<Comment>> {
        self.store.user(user_id)?;
        Ok(self.store.comments_by_user(user_id))
    }

    /// Comments attached to `post_id`. Fails if the post does not exist.
    pub fn post_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.store.post(post_id)?;
        Ok(self.store.comments_by_post(post_id))
    }
}
