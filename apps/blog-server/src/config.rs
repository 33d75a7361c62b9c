//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Where posts live.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    /// One Markdown file per post under `dir`.
    File { dir: PathBuf },
    /// Process-local list, optionally seeded with a welcome post.
    Memory { seed: bool },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    /// Author recorded on posts that do not name one.
    pub author: String,
    pub minimax_api_key: Option<String>,
    pub minimax_base_url: Option<String>,
    pub amap_api_key: Option<String>,
    pub amap_base_url: Option<String>,
    pub default_city: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let storage = match non_empty("POSTS_BACKEND").as_deref() {
            Some("memory") => StorageConfig::Memory {
                seed: non_empty("POSTS_SEED")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            },
            _ => StorageConfig::File {
                dir: non_empty("POSTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("posts")),
            },
        };

        Self {
            host: non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            storage,
            author: non_empty("BLOG_AUTHOR").unwrap_or_else(|| "Blog Owner".to_string()),
            minimax_api_key: non_empty("MINIMAX_API_KEY"),
            minimax_base_url: non_empty("MINIMAX_BASE_URL"),
            amap_api_key: non_empty("AMAP_API_KEY"),
            amap_base_url: non_empty("AMAP_BASE_URL"),
            default_city: non_empty("WEATHER_DEFAULT_CITY").unwrap_or_else(|| "北京".to_string()),
        }
    }
}
