use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{ContentItem, ContentSource};
use crate::storage::{self, StorageError};

/// Reads the scraper's JSON cache file (a JSON array of [`ContentItem`]).
///
/// A missing file is an empty snapshot; an unreadable or malformed file is a
/// [`StorageError`], so a broken cache cannot masquerade as "no posts".
#[derive(Debug, Clone)]
pub struct JsonContentCache {
    path: PathBuf,
}

impl JsonContentCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentSource for JsonContentCache {
    async fn snapshot(&self) -> Result<Vec<ContentItem>, StorageError> {
        let raw = storage::read_or_empty(&self.path).await?;
        if raw.trim().is_empty() {
            tracing::debug!(path = %self.path.display(), "no content cache, empty snapshot");
            return Ok(Vec::new());
        }

        let items: Vec<ContentItem> =
            serde_json::from_str(&raw).map_err(|source| StorageError::MalformedContent {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), items = items.len(), "loaded content snapshot");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_cache_is_empty() {
        let tmp = TempDir::new().unwrap();
        let cache = JsonContentCache::new(tmp.path().join("blog_cache.json"));
        assert!(cache.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reads_scraper_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog_cache.json");
        std::fs::write(
            &path,
            r#"[
                {"title": "On Databases", "body": "Postgres vs SQLite", "url": "https://blog.example/db",
                 "published_at": 1763164800, "scraped_at": 1763200000, "summary": "A comparison"},
                {"title": "Untitled", "url": "https://blog.example/x", "published_at": 1763000000}
            ]"#,
        )
        .unwrap();

        let items = JsonContentCache::new(&path).snapshot().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "On Databases");
        assert_eq!(items[0].summary.as_deref(), Some("A comparison"));
        assert_eq!(items[1].body, "");
        assert_eq!(items[1].scraped_at, 0);
    }

    #[tokio::test]
    async fn malformed_cache_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog_cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonContentCache::new(&path).snapshot().await.unwrap_err();
        assert!(matches!(err, StorageError::MalformedContent { .. }));
    }
}
