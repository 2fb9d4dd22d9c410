//! Records held by the store and the inputs mutations accept.
//!
//! Field names on the wire follow the demo schema (`fullName`, `user_id`,
//! `post_id`). Update inputs are partial patches: a `None` field keeps the
//! stored value.

use serde::{Deserialize, Serialize};

/// The collections the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Posts,
    Comments,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Posts, Collection::Comments];

    /// Singular entity name, as used in topic names and error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Collection::Users => "user",
            Collection::Posts => "post",
            Collection::Comments => "comment",
        }
    }
}

/// A record stored in one of the collections.
pub trait Record: Clone {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

/// A partial update applied onto a stored record.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub post_id: String,
    pub user_id: String,
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Post {
    const COLLECTION: Collection = Collection::Posts;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Comment {
    const COLLECTION: Collection = Collection::Comments;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub age: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub text: String,
    pub post_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Patch<User> for UpdateUserInput {
    fn apply(self, target: &mut User) {
        if let Some(full_name) = self.full_name {
            target.full_name = full_name;
        }
        if let Some(age) = self.age {
            target.age = age;
        }
    }
}

impl Patch<Post> for UpdatePostInput {
    fn apply(self, target: &mut Post) {
        if let Some(title) = self.title {
            target.title = title;
        }
        if let Some(user_id) = self.user_id {
            target.user_id = user_id;
        }
    }
}

impl Patch<Comment> for UpdateCommentInput {
    fn apply(self, target: &mut Comment) {
        if let Some(text) = self.text {
            target.text = text;
        }
        if let Some(post_id) = self.post_id {
            target.post_id = post_id;
        }
        if let Some(user_id) = self.user_id {
            target.user_id = user_id;
        }
    }
}
