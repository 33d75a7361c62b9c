use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Characters of content read per minute.
pub const READ_CHARS_PER_MINUTE: usize = 250;

/// Length of a derived excerpt, in characters.
pub const EXCERPT_LEN: usize = 200;

/// Title shown for stored documents that lack one.
pub const UNTITLED: &str = "Untitled";

/// Post entity - a blog post as served to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub content: String,
    pub read_time: usize,
}

/// Metadata block persisted ahead of the post body.
///
/// Every field is optional so hand-written documents load; unknown keys are
/// kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A post as held by a repository backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPost {
    pub slug: String,
    pub front_matter: FrontMatter,
    pub content: String,
}

/// Defaults applied when a stored post is materialized.
#[derive(Debug, Clone)]
pub struct PostDefaults {
    pub author: String,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            author: "Blog Owner".to_string(),
        }
    }
}

/// Fields accepted when creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
}

/// Partial update: only `Some` fields replace stored values.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
}

impl StoredPost {
    /// Build the stored form of a new post. `slug` and `date` are resolved by the caller.
    pub fn from_draft(slug: String, date: String, draft: NewPost, defaults: &PostDefaults) -> Self {
        Self {
            slug,
            front_matter: FrontMatter {
                title: Some(draft.title),
                date: Some(serde_yaml::Value::String(date)),
                excerpt: non_blank(draft.excerpt),
                cover_image: non_blank(draft.cover_image),
                category: non_blank(draft.category),
                tags: draft.tags,
                author: Some(non_blank(draft.author).unwrap_or_else(|| defaults.author.clone())),
                extra: BTreeMap::new(),
            },
            content: draft.content,
        }
    }

    /// Merge a patch over this post. `date` and unknown keys are left alone.
    pub fn apply(&mut self, patch: PostPatch) {
        let fm = &mut self.front_matter;
        if let Some(title) = patch.title {
            fm.title = Some(title);
        }
        if let Some(excerpt) = patch.excerpt {
            fm.excerpt = Some(excerpt);
        }
        if let Some(cover_image) = patch.cover_image {
            fm.cover_image = Some(cover_image);
        }
        if let Some(category) = patch.category {
            fm.category = Some(category);
        }
        if let Some(tags) = patch.tags {
            fm.tags = Some(tags);
        }
        if let Some(author) = patch.author {
            fm.author = Some(author);
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    /// Canonicalize into the public `Post`, filling every default.
    ///
    /// This is the only place defaults are applied; `now` stands in for a
    /// missing or non-string date.
    pub fn materialize(&self, defaults: &PostDefaults, now: DateTime<Utc>) -> Post {
        let fm = &self.front_matter;

        let date = match &fm.date {
            Some(serde_yaml::Value::String(date)) if !date.trim().is_empty() => date.clone(),
            _ => format_timestamp(now),
        };

        Post {
            slug: self.slug.clone(),
            title: fm
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            date,
            excerpt: non_blank(fm.excerpt.clone())
                .unwrap_or_else(|| derive_excerpt(&self.content)),
            cover_image: non_blank(fm.cover_image.clone()),
            category: non_blank(fm.category.clone()),
            tags: fm.tags.clone().unwrap_or_default(),
            author: non_blank(fm.author.clone()).unwrap_or_else(|| defaults.author.clone()),
            read_time: read_time(&self.content),
            content: self.content.clone(),
        }
    }
}

/// Blank strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Minutes to read `content`, rounded up.
pub fn read_time(content: &str) -> usize {
    content.chars().count().div_ceil(READ_CHARS_PER_MINUTE)
}

/// First [`EXCERPT_LEN`] characters of the body.
pub fn derive_excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_LEN).collect()
}

/// ISO-8601 timestamp with millisecond precision and a `Z` suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the date formats posts carry in the wild.
///
/// Returns `None` for anything unrecognised so such posts can sort last.
pub fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort newest first. The sort is stable, so equal dates keep their order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_cached_key(|post| std::cmp::Reverse(parse_date(&post.date)));
}
