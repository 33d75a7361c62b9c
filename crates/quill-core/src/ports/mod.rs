//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod image;
mod repository;
mod weather;

pub use image::{ImageGenerator, ImageRequest};
pub use repository::PostRepository;
pub use weather::{WeatherProvider, WeatherReport};

/// Errors from outbound service adapters.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("Service not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Unexpected upstream response: {0}")]
    InvalidResponse(String),
}
