//! MiniMax text-to-image adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quill_core::ports::{ImageGenerator, ImageRequest, IntegrationError};

use super::{http_client, invalid_response, upstream};

/// MiniMax API settings.
#[derive(Debug, Clone)]
pub struct MinimaxConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl MinimaxConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.minimax.chat";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model: "image-01".to_string(),
        }
    }
}

#[derive(Serialize)]
struct TextToImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    aspect_ratio: &'a str,
    n: u32,
    prompt_optimizer: bool,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    image: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    url: String,
}

impl TextToImageResponse {
    fn first_url(self) -> Option<String> {
        self.choices.into_iter().next()?.image.map(|image| image.url)
    }
}

/// Image generator backed by the MiniMax `text_to_image` endpoint.
pub struct MinimaxImageGenerator {
    config: MinimaxConfig,
    client: reqwest::Client,
}

impl MinimaxImageGenerator {
    pub fn new(config: MinimaxConfig) -> Result<Self, IntegrationError> {
        Ok(Self {
            config,
            client: http_client()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/text_to_image", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ImageGenerator for MinimaxImageGenerator {
    async fn generate(&self, request: ImageRequest) -> Result<String, IntegrationError> {
        tracing::debug!(aspect_ratio = %request.aspect_ratio, n = request.n, "Requesting image");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&TextToImageRequest {
                model: &self.config.model,
                prompt: &request.prompt,
                aspect_ratio: &request.aspect_ratio,
                n: request.n,
                prompt_optimizer: true,
            })
            .send()
            .await
            .map_err(upstream)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "MiniMax rejected image request");
            return Err(IntegrationError::Upstream(format!("MiniMax returned {status}")));
        }

        let body: TextToImageResponse = response.json().await.map_err(invalid_response)?;
        body.first_url().ok_or_else(|| {
            IntegrationError::InvalidResponse("no image in MiniMax response".to_string())
        })
    }
}
