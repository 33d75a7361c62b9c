//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post not found: {slug}")]
    NotFound { slug: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Post already exists: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(slug: impl Into<String>) -> Self {
        DomainError::NotFound { slug: slug.into() }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document {slug}: {reason}")]
    Malformed { slug: String, reason: String },

    #[error("Entity not found")]
    NotFound,

    #[error("Entity already exists")]
    Conflict,
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Io(e) => DomainError::Storage(e.to_string()),
            RepoError::Malformed { slug, reason } => {
                DomainError::Internal(format!("malformed post {slug}: {reason}"))
            }
            // Callers that know the slug map these themselves.
            RepoError::NotFound => DomainError::not_found(""),
            RepoError::Conflict => DomainError::Conflict(String::new()),
        }
    }
}
