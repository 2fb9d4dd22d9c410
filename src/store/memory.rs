//! In-memory store
//!
//! `Store` owns the three collections behind a single mutex. Handlers share
//! it through an `Arc`; nothing outside this module touches the vectors
//! directly, and the broker never sees the store at all.
//!
//! Writes take a `then` callback that runs while the store lock is still
//! held. Handlers publish from inside it, so events (and counts in
//! particular) reach the broker in the same order the writes committed.
//! The callback must not call back into the store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::store::models::{
    Collection, Comment, CreateCommentInput, CreatePostInput, CreateUserInput, Patch, Post,
    Record, UpdateCommentInput, UpdatePostInput, UpdateUserInput, User,
};
use crate::utils::error::StoreError;

/// Outcome of a mutation that changed a collection's size: the record
/// involved and the collection size right after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    pub record: T,
    pub count: usize,
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

#[derive(Debug, Default)]
pub struct Store {
    data: Mutex<Collections>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the demo dataset.
    pub fn seeded() -> Self {
        let user = |id: &str, full_name: &str, age| User {
            id: id.to_string(),
            full_name: full_name.to_string(),
            age,
        };
        let post = |id: &str, title: &str, user_id: &str| Post {
            id: id.to_string(),
            title: title.to_string(),
            user_id: user_id.to_string(),
        };
        let comment = |id: &str, text: &str, post_id: &str, user_id: &str| Comment {
            id: id.to_string(),
            text: text.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
        };

        let data = Collections {
            users: vec![user("1", "Onur Aylanc", 29), user("2", "Aylanc Onur", 32)],
            posts: vec![
                post("1", "Onur's post", "1"),
                post("2", "Aylanc's post", "2"),
                post("3", "Aylanc's second post", "2"),
            ],
            comments: vec![
                comment("1", "Onur's comment", "1", "1"),
                comment("2", "Aylanc's comment", "1", "2"),
                comment("3", "Aylanc's second comment", "2", "2"),
                comment("4", "Onur's second comment", "3", "1"),
            ],
        };

        Self {
            data: Mutex::new(data),
        }
    }

    fn data(&self) -> MutexGuard<'_, Collections> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.with_count(collection, |count| count)
    }

    /// Read the size of `collection` and hand it to `then` while the store
    /// lock is held, so no write can land in between.
    pub fn with_count<R>(&self, collection: Collection, then: impl FnOnce(usize) -> R) -> R {
        let data = self.data();
        let count = match collection {
            Collection::Users => data.users.len(),
            Collection::Posts => data.posts.len(),
            Collection::Comments => data.comments.len(),
        };
        then(count)
    }

    // Users

    pub fn users(&self) -> Vec<User> {
        self.data().users.clone()
    }

    pub fn user(&self, id: &str) -> Result<User, StoreError> {
        find(&self.data().users, id)
    }

    pub fn create_user<R>(
        &self,
        input: CreateUserInput,
        then: impl FnOnce(Committed<User>) -> R,
    ) -> R {
        let user = User {
            id: new_id(),
            full_name: input.full_name,
            age: input.age,
        };
        insert(&mut self.data().users, user, then)
    }

    pub fn update_user<R>(
        &self,
        id: &str,
        patch: UpdateUserInput,
        then: impl FnOnce(User) -> R,
    ) -> Result<R, StoreError> {
        update(&mut self.data().users, id, patch, then)
    }

    pub fn delete_user<R>(
        &self,
        id: &str,
        then: impl FnOnce(Committed<User>) -> R,
    ) -> Result<R, StoreError> {
        remove(&mut self.data().users, id, then)
    }

    /// `then` receives the number of records removed.
    pub fn delete_all_users<R>(&self, then: impl FnOnce(usize) -> R) -> R {
        clear(&mut self.data().users, then)
    }

    // Posts

    pub fn posts(&self) -> Vec<Post> {
        self.data().posts.clone()
    }

    pub fn post(&self, id: &str) -> Result<Post, StoreError> {
        find(&self.data().posts, id)
    }

    pub fn posts_by_user(&self, user_id: &str) -> Vec<Post> {
        self.data()
            .posts
            .iter()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn create_post<R>(
        &self,
        input: CreatePostInput,
        then: impl FnOnce(Committed<Post>) -> R,
    ) -> R {
        let post = Post {
            id: new_id(),
            title: input.title,
            user_id: input.user_id,
        };
        insert(&mut self.data().posts, post, then)
    }

    pub fn update_post<R>(
        &self,
        id: &str,
        patch: UpdatePostInput,
        then: impl FnOnce(Post) -> R,
    ) -> Result<R, StoreError> {
        update(&mut self.data().posts, id, patch, then)
    }

    pub fn delete_post<R>(
        &self,
        id: &str,
        then: impl FnOnce(Committed<Post>) -> R,
    ) -> Result<R, StoreError> {
        remove(&mut self.data().posts, id, then)
    }

    pub fn delete_all_posts<R>(&self, then: impl FnOnce(usize) -> R) -> R {
        clear(&mut self.data().posts, then)
    }

    // Comments

    pub fn comments(&self) -> Vec<Comment> {
        self.data().comments.clone()
    }

    pub fn comment(&self, id: &str) -> Result<Comment, StoreError> {
        find(&self.data().comments, id)
    }

    pub fn comments_by_user(&self, user_id: &str) -> Vec<Comment> {
        self.data()
            .comments
            .iter()
            .filter(|comment| comment.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn comments_by_post(&self, post_id: &str) -> Vec<Comment> {
        self.data()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect()
    }

    pub fn create_comment<R>(
        &self,
        input: CreateCommentInput,
        then: impl FnOnce(Committed<Comment>) -> R,
    ) -> R {
        let comment = Comment {
            id: new_id(),
            text: input.text,
            post_id: input.post_id,
            user_id: input.user_id,
        };
        insert(&mut self.data().comments, comment, then)
    }

    pub fn update_comment<R>(
        &self,
        id: &str,
        patch: UpdateCommentInput,
        then: impl FnOnce(Comment) -> R,
    ) -> Result<R, StoreError> {
        update(&mut self.data().comments, id, patch, then)
    }

    pub fn delete_comment<R>(
        &self,
        id: &str,
        then: impl FnOnce(Committed<Comment>) -> R,
    ) -> Result<R, StoreError> {
        remove(&mut self.data().comments, id, then)
    }

    pub fn delete_all_comments<R>(&self, then: impl FnOnce(usize) -> R) -> R {
        clear(&mut self.data().comments, then)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn not_found<T: Record>(id: &str) -> StoreError {
    StoreError::NotFound {
        entity: T::COLLECTION.entity(),
        id: id.to_string(),
    }
}

fn find<T: Record>(items: &[T], id: &str) -> Result<T, StoreError> {
    items
        .iter()
        .find(|record| record.id() == id)
        .cloned()
        .ok_or_else(|| not_found::<T>(id))
}

// The helpers below are always handed a slice borrowed from a live guard,
// so `then` runs before the store lock is released.

fn insert<T: Record, R>(
    items: &mut Vec<T>,
    record: T,
    then: impl FnOnce(Committed<T>) -> R,
) -> R {
    items.push(record.clone());
    let count = items.len();
    then(Committed { record, count })
}

fn update<T: Record, P: Patch<T>, R>(
    items: &mut [T],
    id: &str,
    patch: P,
    then: impl FnOnce(T) -> R,
) -> Result<R, StoreError> {
    let record = items
        .iter_mut()
        .find(|record| record.id() == id)
        .ok_or_else(|| not_found::<T>(id))?;
    patch.apply(record);
    Ok(then(record.clone()))
}

fn remove<T: Record, R>(
    items: &mut Vec<T>,
    id: &str,
    then: impl FnOnce(Committed<T>) -> R,
) -> Result<R, StoreError> {
    let index = items
        .iter()
        .position(|record| record.id() == id)
        .ok_or_else(|| not_found::<T>(id))?;
    let record = items.remove(index);
    let count = items.len();
    Ok(then(Committed { record, count }))
}

fn clear<T, R>(items: &mut Vec<T>, then: impl FnOnce(usize) -> R) -> R {
    let removed = items.len();
    items.clear();
    then(removed)
}
