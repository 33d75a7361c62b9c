use async_trait::async_trait;

use super::IntegrationError;

/// Text-to-image request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: String,
    pub n: u32,
}

/// Image generation service (e.g. MiniMax).
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image and return its URL.
    async fn generate(&self, request: ImageRequest) -> Result<String, IntegrationError>;
}
