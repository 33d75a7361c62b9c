//! Domain entities - the core business objects.

mod post;
pub mod slug;

pub use post::{
    EXCERPT_LEN, FrontMatter, NewPost, Post, PostDefaults, PostPatch, READ_CHARS_PER_MINUTE,
    StoredPost, UNTITLED, derive_excerpt, format_timestamp, parse_date, read_time,
    sort_newest_first,
};
pub use slug::{is_safe_slug, is_valid_slug, slugify};
