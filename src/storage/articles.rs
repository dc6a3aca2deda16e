//! Article bundles under the site's content directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::write_bytes;
use crate::error::Result;

/// Locations of one article bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Bundle directory, named after the note title
    pub dir: PathBuf,
    /// Generated markdown document inside the bundle
    pub index: PathBuf,
}

impl Article {
    /// Whether the article was written by an earlier conversion.
    pub fn exists(&self) -> bool {
        self.index.is_file()
    }
}

/// Writes article bundles below a content directory.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    content_dir: PathBuf,
    index_file: String,
}

impl ArticleStore {
    pub fn new(content_dir: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            content_dir: content_dir.into(),
            index_file: index_file.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Bundle locations for a title. Nothing is touched on disk.
    pub fn article(&self, title: &str) -> Article {
        let dir = self.content_dir.join(title);
        let index = dir.join(&self.index_file);
        Article { dir, index }
    }

    /// Create the bundle directory if it is missing.
    pub fn ensure_dir(&self, article: &Article) -> Result<()> {
        fs::create_dir_all(&article.dir)?;
        Ok(())
    }

    /// Replace the article's index document.
    pub fn write_index(&self, article: &Article, content: &str) -> Result<()> {
        write_bytes(&article.index, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_article_paths() {
        let store = ArticleStore::new("/site/content/post", "index.md");
        let article = store.article("Rust Ownership");

        assert_eq!(article.dir, PathBuf::from("/site/content/post/Rust Ownership"));
        assert_eq!(
            article.index,
            PathBuf::from("/site/content/post/Rust Ownership/index.md")
        );
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = ArticleStore::new(tmp.path().join("content/post"), "index.md");
        let article = store.article("Post");

        store.ensure_dir(&article).unwrap();
        store.ensure_dir(&article).unwrap();
        assert!(article.dir.is_dir());
        assert!(!article.exists());
    }

    #[test]
    fn test_write_index_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = ArticleStore::new(tmp.path(), "index.md");
        let article = store.article("Post");
        store.ensure_dir(&article).unwrap();

        store.write_index(&article, "first").unwrap();
        store.write_index(&article, "second").unwrap();

        assert!(article.exists());
        assert_eq!(fs::read_to_string(&article.index).unwrap(), "second");
    }
}
