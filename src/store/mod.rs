// src/store/mod.rs
//! Remote post store: five direct request/response operations, no local
//! retry, no compensation. A failed call leaves remote state unchanged.

pub mod blogger;

pub use blogger::BloggerStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Post;

#[derive(Debug, Error)]
#[error("post store {operation} failed: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Create a post; `is_draft` keeps it out of the public feed.
    async fn create(
        &self,
        title: &str,
        html: &str,
        is_draft: bool,
        labels: &[String],
    ) -> Result<Post, StoreError>;

    /// Replace title and body of an existing post.
    async fn update(&self, post_id: &str, title: &str, html: &str) -> Result<Post, StoreError>;

    async fn get(&self, post_id: &str) -> Result<Post, StoreError>;

    async fn list(&self, max_results: usize) -> Result<Vec<Post>, StoreError>;

    async fn delete(&self, post_id: &str) -> Result<(), StoreError>;
}
