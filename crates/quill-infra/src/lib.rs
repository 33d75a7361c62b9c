//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the post storage backends and outbound service adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - Storage backends only
//! - `integrations` - MiniMax image generation and AMap weather via reqwest

pub mod storage;

#[cfg(feature = "integrations")]
pub mod integrations;

// Re-exports - Storage
pub use storage::{FilePostRepository, InMemoryPostRepository};

#[cfg(feature = "integrations")]
pub use integrations::{AmapConfig, AmapWeatherProvider, MinimaxConfig, MinimaxImageGenerator};
