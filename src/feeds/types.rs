// src/feeds/types.rs
use anyhow::Result;

use crate::article::{Article, Source};

/// Raw shape of one entry in a feed's `items` array. Every field is optional;
/// normalization fills the gaps.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FeedItem {
    #[serde(alias = "id")]
    pub guid: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "url")]
    pub link: Option<String>,
    #[serde(rename = "pubDate", alias = "published")]
    pub pub_date: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "content_html")]
    pub content: Option<String>,
}

/// Top-level feed document. A missing `items` array is an empty feed, not an
/// error.
#[derive(Debug, serde::Deserialize)]
pub struct FeedDoc {
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch and normalize the feed's current items.
    async fn fetch_latest(&self) -> Result<Vec<Article>>;
    fn name(&self) -> &'static str;
    fn source(&self) -> Source;
}
