//! URL slugs derived from post titles.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a generated slug, in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Maximum length accepted for a caller-supplied slug.
pub const MAX_SUPPLIED_SLUG_LEN: usize = 200;

static DISALLOWED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\x{4e00}-\x{9fa5}]+").unwrap());

/// Generate a slug from a title.
///
/// Lowercases, collapses every run of characters outside ASCII letters,
/// digits and CJK ideographs into a single `-`, trims hyphens from both ends
/// and caps the result at [`MAX_SLUG_LEN`] characters.
///
/// Returns an empty string when the title has no allowed character.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = DISALLOWED_RUN.replace_all(&lowered, "-");
    let truncated: String = hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();

    // Truncation can land right after a separator.
    truncated.trim_end_matches('-').to_string()
}

/// Whether `slug` may be assigned to a new post.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && slug.chars().count() <= MAX_SUPPLIED_SLUG_LEN
        && slug.chars().all(is_slug_char)
}

/// Whether `slug` can address an existing post.
///
/// Looser than [`is_valid_slug`] so hand-written files such as `My-Post.md`
/// stay reachable, but never names anything outside the posts directory.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || is_cjk(c)
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}
