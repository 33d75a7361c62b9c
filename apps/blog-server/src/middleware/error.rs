//! Error handling - every failure answers `{ "success": false, "error": ... }`.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use quill_core::DomainError;
use quill_core::ports::IntegrationError;
use quill_shared::ErrorResponse;

/// Application-level error type that converts to JSON error envelopes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    ServiceUnavailable(String),

    /// Detail is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { slug } => AppError::NotFound(format!("Post not found: {slug}")),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(slug) => {
                AppError::Conflict(format!("A post with slug '{slug}' already exists"))
            }
            DomainError::Storage(msg) => AppError::Internal(format!("storage: {msg}")),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<IntegrationError> for AppError {
    fn from(err: IntegrationError) -> Self {
        match err {
            IntegrationError::NotConfigured(service) => {
                AppError::ServiceUnavailable(format!("{service} is not configured"))
            }
            IntegrationError::NotFound(what) => AppError::NotFound(format!("Not found: {what}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Keeps malformed JSON bodies inside the error envelope.
pub fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {err}")).into()
}

/// Keeps malformed query strings inside the error envelope.
pub fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {err}")).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
