// src/ingest/types.rs
use serde::{Deserialize, Serialize};

/// A named feed from the configuration. Order of sources is significant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String, // e.g., "Marketing Dive"
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One `<item>` as it came out of the feed. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub published_raw: String,
    pub description_raw: String, // may still contain markup
}

/// Why a single source produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed feed xml: {0}")]
    Xml(String),
}

/// Anything that can hand back the first `max_items` items of a feed.
#[async_trait::async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch_items(
        &self,
        source: &FeedSource,
        max_items: usize,
    ) -> Result<Vec<RawItem>, FetchError>;
}
