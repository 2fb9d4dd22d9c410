//! The `store` module holds the demo dataset (users, posts, comments) that
//! mutation handlers change and publish about.

pub mod memory;
pub mod models;

pub use memory::{Committed, Store};
pub use models::{Collection, Comment, Post, Record, User};

#[cfg(test)]
mod tests;
