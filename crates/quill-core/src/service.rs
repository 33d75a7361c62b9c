//! Post operations on top of a `PostRepository` backend.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    NewPost, Post, PostDefaults, PostPatch, StoredPost, format_timestamp, is_safe_slug,
    is_valid_slug, slugify, sort_newest_first,
};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// CRUD over posts with validation, slug derivation and defaulting.
///
/// Behaves the same whichever backend it is given.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    defaults: PostDefaults,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, defaults: PostDefaults) -> Self {
        Self { repo, defaults }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let now = Utc::now();
        let mut posts: Vec<Post> = self
            .repo
            .find_all()
            .await?
            .iter()
            .map(|stored| stored.materialize(&self.defaults, now))
            .collect();

        sort_newest_first(&mut posts);
        Ok(posts)
    }

    pub async fn get(&self, slug: &str) -> Result<Post, DomainError> {
        let stored = self.load(slug).await?;
        Ok(stored.materialize(&self.defaults, Utc::now()))
    }

    /// Create a post. The slug is derived from the title unless supplied.
    pub async fn create(&self, draft: NewPost) -> Result<Post, DomainError> {
        if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "title and content are required".to_string(),
            ));
        }

        let slug = match draft.slug.as_deref() {
            Some(slug) if !is_valid_slug(slug) => {
                return Err(DomainError::Validation(format!("invalid slug: {slug}")));
            }
            Some(slug) => slug.to_string(),
            None => {
                let slug = slugify(&draft.title);
                if slug.is_empty() {
                    return Err(DomainError::Validation(
                        "title must contain at least one letter, digit or CJK character"
                            .to_string(),
                    ));
                }
                slug
            }
        };

        let now = Utc::now();
        let date = draft
            .date
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format_timestamp(now));
        let stored = StoredPost::from_draft(slug.clone(), date, draft, &self.defaults);

        self.repo.insert(stored.clone()).await.map_err(|e| match e {
            RepoError::Conflict => DomainError::Conflict(slug.clone()),
            other => other.into(),
        })?;

        tracing::info!(slug = %slug, "Post created");
        Ok(stored.materialize(&self.defaults, now))
    }

    /// Merge `patch` over the stored post. `date` never changes.
    pub async fn update(&self, slug: &str, patch: PostPatch) -> Result<Post, DomainError> {
        let empty = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());
        if empty(&patch.title) || empty(&patch.content) {
            return Err(DomainError::Validation(
                "title and content cannot be empty".to_string(),
            ));
        }

        let mut stored = self.load(slug).await?;
        stored.apply(patch);

        self.repo
            .update(stored.clone())
            .await
            .map_err(|e| not_found_or(slug, e))?;

        tracing::info!(slug = %slug, "Post updated");
        Ok(stored.materialize(&self.defaults, Utc::now()))
    }

    /// Delete a post. Deleting twice fails with `NotFound`.
    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        if !is_safe_slug(slug) {
            return Err(DomainError::not_found(slug));
        }

        self.repo
            .delete(slug)
            .await
            .map_err(|e| not_found_or(slug, e))?;

        tracing::info!(slug = %slug, "Post deleted");
        Ok(())
    }

    async fn load(&self, slug: &str) -> Result<StoredPost, DomainError> {
        // Never hand an unsafe slug to a backend.
        if !is_safe_slug(slug) {
            return Err(DomainError::not_found(slug));
        }

        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(slug))
    }
}

fn not_found_or(slug: &str, err: RepoError) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found(slug),
        other => other.into(),
    }
}
