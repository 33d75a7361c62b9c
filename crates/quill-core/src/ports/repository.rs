use async_trait::async_trait;

use crate::domain::StoredPost;
use crate::error::RepoError;

/// Storage backend for posts, keyed by slug.
///
/// Backends hold raw `StoredPost`s; defaulting happens in the service layer.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Every stored post, in the backend's stable order.
    async fn find_all(&self) -> Result<Vec<StoredPost>, RepoError>;

    /// Find a post by slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredPost>, RepoError>;

    /// Store a new post. Fails with `RepoError::Conflict` if the slug is taken;
    /// the existence check and the write happen atomically.
    async fn insert(&self, post: StoredPost) -> Result<(), RepoError>;

    /// Replace an existing post. Fails with `RepoError::NotFound` if absent.
    async fn update(&self, post: StoredPost) -> Result<(), RepoError>;

    /// Remove a post. Fails with `RepoError::NotFound` if absent.
    async fn delete(&self, slug: &str) -> Result<(), RepoError>;
}
