//! Externally sourced content (blog posts) and the read-only snapshot seam.
//!
//! The scraper that fills the cache runs elsewhere on its own cadence. This
//! crate only ever reads whatever snapshot a [`ContentSource`] hands back.

pub mod cache;
pub mod filter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

pub use cache::JsonContentCache;
pub use filter::filter_by_date_range;

/// One externally scraped document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub url: String,
    /// Publication time, epoch seconds. Authoritative for date filtering.
    pub published_at: i64,
    /// When the scraper fetched the item, epoch seconds. Informational only.
    #[serde(default)]
    pub scraped_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Supplier of a point-in-time content snapshot.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<ContentItem>, StorageError>;
}

/// A fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    items: Vec<ContentItem>,
}

impl StaticContent {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentSource for StaticContent {
    async fn snapshot(&self) -> Result<Vec<ContentItem>, StorageError> {
        Ok(self.items.clone())
    }
}
