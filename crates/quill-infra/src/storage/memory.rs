//! In-memory post repository - used when no posts directory is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::{FrontMatter, StoredPost};
use quill_core::error::RepoError;
use quill_core::frontmatter::Value;
use quill_core::ports::PostRepository;

/// In-memory repository backed by a `Vec` behind an async RwLock.
///
/// Each process owns an independent copy; data is lost on restart.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<StoredPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    /// Start with the given posts, in insertion order.
    pub fn with_posts(posts: Vec<StoredPost>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<StoredPost>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredPost>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn insert(&self, post: StoredPost) -> Result<(), RepoError> {
        // Check and push under one write lock
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepoError::Conflict);
        }
        posts.push(post);
        Ok(())
    }

    async fn update(&self, post: StoredPost) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.slug == post.slug)
            .ok_or(RepoError::NotFound)?;
        *slot = post;
        Ok(())
    }

    async fn delete(&self, slug: &str) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.slug == slug)
            .ok_or(RepoError::NotFound)?;
        posts.remove(index);
        Ok(())
    }
}

/// Seed post for a fresh in-memory blog.
pub fn welcome_post(author: &str) -> StoredPost {
    StoredPost {
        slug: "welcome".to_string(),
        front_matter: FrontMatter {
            title: Some("Welcome to the blog".to_string()),
            date: Some(Value::String("2024-01-01".to_string())),
            excerpt: Some("The first post on this blog.".to_string()),
            category: Some("life".to_string()),
            tags: Some(vec!["welcome".to_string(), "getting-started".to_string()]),
            author: Some(author.to_string()),
            cover_image: None,
            extra: BTreeMap::new(),
        },
        content: "# Welcome\n\nThis is the first post on this blog.\n\n\
                  Posts are written in Markdown and managed through the `/api/posts` API.\n"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryPostRepository::new();
        repo.insert(welcome_post("me")).await.unwrap();

        let found = repo.find_by_slug("welcome").await.unwrap().unwrap();
        assert_eq!(found.front_matter.author.as_deref(), Some("me"));
        assert!(repo.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let mut second = welcome_post("me");
        second.slug = "second".to_string();
        let repo = InMemoryPostRepository::with_posts(vec![welcome_post("me"), second]);

        let slugs: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["welcome", "second"]);
    }
}
