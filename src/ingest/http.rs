// src/ingest/http.rs
use async_trait::async_trait;
use metrics::histogram;
use reqwest::Client;
use std::time::Duration;

use crate::ingest::rss::parse_items;
use crate::ingest::types::{FeedClient, FeedSource, FetchError, RawItem};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("briefed/", env!("CARGO_PKG_VERSION"));

/// Plain GET, one attempt, explicit timeout on every request.
#[derive(Clone)]
pub struct HttpFeedClient {
    client: Client,
    timeout: Duration,
    user_agent: String,
}

impl HttpFeedClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_items(
        &self,
        source: &FeedSource,
        max_items: usize,
    ) -> Result<Vec<RawItem>, FetchError> {
        let t0 = std::time::Instant::now();
        let request_err = |e: reqwest::Error| FetchError::Request {
            url: source.url.clone(),
            source: e,
        };

        let resp = self
            .client
            .get(&source.url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(request_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(request_err)?;
        let items = parse_items(&body, max_items)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("feed_fetch_ms").record(ms);
        tracing::debug!(
            target: "ingest",
            source = %source.name,
            items = items.len(),
            ms,
            "feed fetched"
        );
        Ok(items)
    }
}
