//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains the post model, the front-matter codec, slug generation
//! and the `PostService`, with no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod frontmatter;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::PostService;
