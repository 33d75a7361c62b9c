//! Markdown-directory post repository.
//!
//! Each post is `<dir>/<slug>.md`: a YAML front-matter block followed by the
//! Markdown body.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use quill_core::domain::{FrontMatter, StoredPost, is_safe_slug};
use quill_core::error::RepoError;
use quill_core::frontmatter;
use quill_core::ports::PostRepository;

const EXTENSION: &str = "md";

/// File-backed repository. Reads always rescan the directory.
pub struct FilePostRepository {
    dir: PathBuf,
    // Serializes writers within this process.
    write_lock: Mutex<()>,
}

impl FilePostRepository {
    /// Open a posts directory, creating it if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        tracing::debug!(dir = %dir.display(), "Opened posts directory");

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.{EXTENSION}"))
    }

    /// Hidden scratch file a document is written to before it goes live.
    fn staging_path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!(".{slug}.{EXTENSION}.tmp"))
    }

    async fn read_post(&self, slug: &str, path: &Path) -> Result<Option<StoredPost>, RepoError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        parse_document(slug, &raw).map(Some)
    }
}

/// Slug for a directory entry, if it is a visible `.md` file.
fn slug_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.starts_with('.') {
        return None;
    }
    if !is_safe_slug(stem) {
        tracing::warn!(path = %path.display(), "Skipping post with an unaddressable name");
        return None;
    }
    Some(stem.to_string())
}

fn parse_document(slug: &str, raw: &str) -> Result<StoredPost, RepoError> {
    let (front_matter, content): (FrontMatter, String) =
        frontmatter::decode_as(raw).map_err(|e| RepoError::Malformed {
            slug: slug.to_string(),
            reason: e.to_string(),
        })?;

    Ok(StoredPost {
        slug: slug.to_string(),
        front_matter,
        content,
    })
}

fn render_document(post: &StoredPost) -> Result<String, RepoError> {
    frontmatter::encode(&post.front_matter, &post.content).map_err(|e| RepoError::Malformed {
        slug: post.slug.clone(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl PostRepository for FilePostRepository {
    async fn find_all(&self) -> Result<Vec<StoredPost>, RepoError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut posts = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }

            let path = entry.path();
            let Some(slug) = slug_of(&path) else {
                continue;
            };

            match self.read_post(&slug, &path).await {
                Ok(Some(post)) => posts.push(post),
                // Deleted between listing and reading
                Ok(None) => {}
                Err(RepoError::Malformed { slug, reason }) => {
                    tracing::warn!(slug = %slug, "Skipping malformed post: {}", reason);
                }
                Err(e) => return Err(e),
            }
        }

        // read_dir order is unspecified
        posts.sort_by(|a, b| a.slug.cmp(&b.slug));

        tracing::debug!(count = posts.len(), "Loaded posts from disk");
        Ok(posts)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredPost>, RepoError> {
        tracing::debug!(slug = %slug, "Reading post");
        self.read_post(slug, &self.path_for(slug)).await
    }

    async fn insert(&self, post: StoredPost) -> Result<(), RepoError> {
        let document = render_document(&post)?;
        let path = self.path_for(&post.slug);
        let staging = self.staging_path_for(&post.slug);

        let _guard = self.write_lock.lock().await;

        // The post only appears once the full document is on disk. Linking
        // fails if the slug is taken, also for other processes sharing the
        // directory.
        let linked = match fs::write(&staging, document).await {
            Ok(()) => fs::hard_link(&staging, &path).await,
            Err(e) => Err(e),
        };
        match fs::remove_file(&staging).await {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                tracing::warn!(path = %staging.display(), "Failed to remove staging file: {}", e);
            }
            _ => {}
        }

        match linked {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Wrote new post");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(RepoError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, post: StoredPost) -> Result<(), RepoError> {
        let document = render_document(&post)?;
        let path = self.path_for(&post.slug);
        let staging = self.staging_path_for(&post.slug);

        let _guard = self.write_lock.lock().await;

        if !fs::try_exists(&path).await? {
            return Err(RepoError::NotFound);
        }

        // Write aside and rename so readers never see a half-written post.
        if let Err(e) = fs::write(&staging, document).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }
        fs::rename(&staging, &path).await?;

        tracing::debug!(path = %path.display(), "Rewrote post");
        Ok(())
    }

    async fn delete(&self, slug: &str) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;

        match fs::remove_file(self.path_for(slug)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RepoError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_of() {
        assert_eq!(slug_of(Path::new("/p/hello-world.md")).as_deref(), Some("hello-world"));
        assert_eq!(slug_of(Path::new("/p/你好.md")).as_deref(), Some("你好"));
        assert_eq!(slug_of(Path::new("/p/notes.txt")), None);
        assert_eq!(slug_of(Path::new("/p/.draft.md")), None);
        assert_eq!(slug_of(Path::new("/p/post.md.tmp")), None);
        assert_eq!(slug_of(Path::new("/p/.post.md.tmp")), None);
    }

    #[test]
    fn test_slug_of_hand_written_names() {
        assert_eq!(slug_of(Path::new("/p/My-Post.md")).as_deref(), Some("My-Post"));
        assert_eq!(
            slug_of(Path::new("/p/v1.0-release.md")).as_deref(),
            Some("v1.0-release")
        );
    }

    #[tokio::test]
    async fn test_reads_hand_written_document() {
        let dir = tempfile::tempdir().unwrap();
        let raw = "---\ntitle: Hand written\ndate: 2024-01-02\ntags: [a, b]\nlayout: wide\n---\n\nHello\n";
        std::fs::write(dir.path().join("hand-written.md"), raw).unwrap();

        let repo = FilePostRepository::open(dir.path()).await.unwrap();
        let post = repo.find_by_slug("hand-written").await.unwrap().unwrap();

        assert_eq!(post.front_matter.title.as_deref(), Some("Hand written"));
        assert_eq!(
            post.front_matter.tags,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(post.front_matter.extra.contains_key("layout"));
        assert_eq!(post.content, "Hello\n");
    }

    #[tokio::test]
    async fn test_document_without_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plain.md"), "# Just markdown\n").unwrap();

        let repo = FilePostRepository::open(dir.path()).await.unwrap();
        let post = repo.find_by_slug("plain").await.unwrap().unwrap();

        assert_eq!(post.front_matter, FrontMatter::default());
        assert_eq!(post.content, "# Just markdown\n");
    }

    #[tokio::test]
    async fn test_find_all_skips_malformed_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.md"), "---\ntitle: Good\n---\n\nok").unwrap();
        std::fs::write(dir.path().join("broken.md"), "---\ntitle: never closed\n").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "not a post").unwrap();
        std::fs::create_dir(dir.path().join("nested.md")).unwrap();

        let repo = FilePostRepository::open(dir.path()).await.unwrap();
        let posts = repo.find_all().await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }

    #[tokio::test]
    async fn test_find_by_slug_reports_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.md"), "---\ntitle: [unterminated\n---\n").unwrap();

        let repo = FilePostRepository::open(dir.path()).await.unwrap();
        let result = repo.find_by_slug("broken").await;

        assert!(matches!(result, Err(RepoError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_missing_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");

        let repo = FilePostRepository::open(&posts_dir).await.unwrap();
        std::fs::remove_dir(&posts_dir).unwrap();

        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_written_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePostRepository::open(dir.path()).await.unwrap();

        let post = StoredPost {
            slug: "layout".to_string(),
            front_matter: FrontMatter {
                title: Some("Layout".to_string()),
                ..FrontMatter::default()
            },
            content: "Body".to_string(),
        };
        repo.insert(post).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("layout.md")).unwrap();
        assert_eq!(raw, "---\ntitle: Layout\n---\n\nBody");
    }

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn post(slug: &str) -> StoredPost {
        StoredPost {
            slug: slug.to_string(),
            front_matter: FrontMatter::default(),
            content: "Body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePostRepository::open(dir.path()).await.unwrap();

        repo.insert(post("once")).await.unwrap();
        assert!(matches!(
            repo.insert(post("once")).await,
            Err(RepoError::Conflict)
        ));
        repo.update(post("once")).await.unwrap();

        assert_eq!(entry_names(dir.path()), vec!["once.md"]);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_no_post() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePostRepository::open(dir.path()).await.unwrap();

        // A directory squatting on the staging path makes the write fail.
        std::fs::create_dir(dir.path().join(".doomed.md.tmp")).unwrap();

        let result = repo.insert(post("doomed")).await;
        assert!(matches!(result, Err(RepoError::Io(_))));
        assert!(!dir.path().join("doomed.md").exists());
        assert!(repo.find_all().await.unwrap().is_empty());

        // Once the obstruction is gone the same slug can be created.
        std::fs::remove_dir(dir.path().join(".doomed.md.tmp")).unwrap();
        repo.insert(post("doomed")).await.unwrap();
        assert_eq!(entry_names(dir.path()), vec!["doomed.md"]);
    }

    #[tokio::test]
    async fn test_unreadable_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");

        let repo = FilePostRepository::open(&posts_dir).await.unwrap();
        std::fs::remove_dir(&posts_dir).unwrap();
        std::fs::write(&posts_dir, "not a directory").unwrap();

        assert!(matches!(repo.find_all().await, Err(RepoError::Io(_))));
    }
}
