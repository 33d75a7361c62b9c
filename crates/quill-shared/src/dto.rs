//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/posts`. `title` and `content` are checked by the handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
}

/// Body of `PUT /api/posts`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
}

/// `?slug=` selector shared by the posts routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

/// Body of `POST /api/generate-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_image_count")]
    pub n: u32,
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_image_count() -> u32 {
    1
}

/// Payload of a successful image generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageResponse {
    pub image_url: String,
}

/// `?city=` for the weather endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}
