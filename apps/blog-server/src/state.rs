//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostService;
use quill_core::domain::PostDefaults;
use quill_core::error::RepoError;
use quill_core::ports::{ImageGenerator, PostRepository, WeatherProvider};
use quill_infra::storage::{FilePostRepository, InMemoryPostRepository, welcome_post};

use crate::config::{AppConfig, StorageConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub weather: Option<Arc<dyn WeatherProvider>>,
    pub default_city: String,
}

impl AppState {
    pub fn new(posts: PostService, default_city: impl Into<String>) -> Self {
        Self {
            posts,
            images: None,
            weather: None,
            default_city: default_city.into(),
        }
    }

    /// Build the application state with the configured implementations.
    /// Fails if the posts directory cannot be opened.
    pub async fn from_config(config: &AppConfig) -> Result<Self, RepoError> {
        let defaults = PostDefaults {
            author: config.author.clone(),
        };

        let repo: Arc<dyn PostRepository> = match &config.storage {
            StorageConfig::File { dir } => {
                let repo = FilePostRepository::open(dir).await.inspect_err(|e| {
                    tracing::error!("Failed to open posts directory {}: {}", dir.display(), e);
                })?;
                tracing::info!(dir = %repo.dir().display(), "Serving posts from directory");
                Arc::new(repo)
            }
            StorageConfig::Memory { seed } => {
                tracing::warn!("POSTS_BACKEND=memory - posts are lost on restart");
                let posts = if *seed {
                    vec![welcome_post(&config.author)]
                } else {
                    Vec::new()
                };
                Arc::new(InMemoryPostRepository::with_posts(posts))
            }
        };

        #[allow(unused_mut)]
        let mut state = Self::new(PostService::new(repo, defaults), config.default_city.clone());

        #[cfg(feature = "integrations")]
        {
            state.images = image_generator(config);
            state.weather = weather_provider(config);
        }

        tracing::info!(
            images = state.images.is_some(),
            weather = state.weather.is_some(),
            "Application state initialized"
        );

        Ok(state)
    }
}

#[cfg(feature = "integrations")]
fn image_generator(config: &AppConfig) -> Option<Arc<dyn ImageGenerator>> {
    use quill_infra::integrations::{MinimaxConfig, MinimaxImageGenerator};

    let Some(api_key) = &config.minimax_api_key else {
        tracing::warn!("MINIMAX_API_KEY not set. Image generation disabled.");
        return None;
    };

    let mut minimax = MinimaxConfig::new(api_key.clone());
    if let Some(base_url) = &config.minimax_base_url {
        minimax.base_url = base_url.clone();
    }

    match MinimaxImageGenerator::new(minimax) {
        Ok(generator) => Some(Arc::new(generator)),
        Err(e) => {
            tracing::error!("Failed to build image client: {}", e);
            None
        }
    }
}

#[cfg(feature = "integrations")]
fn weather_provider(config: &AppConfig) -> Option<Arc<dyn WeatherProvider>> {
    use quill_infra::integrations::{AmapConfig, AmapWeatherProvider};

    let Some(api_key) = &config.amap_api_key else {
        tracing::warn!("AMAP_API_KEY not set. Weather lookup disabled.");
        return None;
    };

    let mut amap = AmapConfig::new(api_key.clone());
    if let Some(base_url) = &config.amap_base_url {
        amap.base_url = base_url.clone();
    }

    match AmapWeatherProvider::new(amap) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            tracing::error!("Failed to build weather client: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(storage: StorageConfig) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            storage,
            author: "Tester".to_string(),
            minimax_api_key: None,
            minimax_base_url: None,
            amap_api_key: None,
            amap_base_url: None,
            default_city: "北京".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_seeded_memory_state() {
        let state = AppState::from_config(&config(StorageConfig::Memory { seed: true }))
            .await
            .unwrap();

        let posts = state.posts.list().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "welcome");
        assert_eq!(posts[0].author, "Tester");
        assert!(state.images.is_none());
        assert!(state.weather.is_none());
    }

    #[actix_web::test]
    async fn test_file_state_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir: PathBuf = dir.path().join("posts");

        let state = AppState::from_config(&config(StorageConfig::File {
            dir: posts_dir.clone(),
        }))
        .await
        .unwrap();

        assert!(posts_dir.is_dir());
        assert!(state.posts.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unopenable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a regular file").unwrap();

        let result = AppState::from_config(&config(StorageConfig::File {
            dir: blocker.join("posts"),
        }))
        .await;

        assert!(matches!(result, Err(RepoError::Io(_))));
    }
}
