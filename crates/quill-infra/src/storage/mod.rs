//! Post storage backends - a Markdown directory and an in-memory list.

mod file;
mod memory;

pub use file::FilePostRepository;
pub use memory::{InMemoryPostRepository, welcome_post};
