//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use postboard_api_types::PostPatch;

use crate::domain::posts::Post;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts in insertion order.
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// Stores the post under one more than the highest id in use.
    async fn create_post(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Applies the fields present in `patch`; `Ok(None)` when `id` is unknown.
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    /// `Ok(false)` when `id` is unknown.
    async fn delete_post(&self, id: i64) -> Result<bool, RepoError>;
}
