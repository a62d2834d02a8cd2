// src/ingest/mod.rs
pub mod http;
pub mod rss;
pub mod types;

use crate::ingest::types::{FeedClient, FeedSource, RawItem};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_items_total", "Raw items returned by feed sources.");
        describe_counter!(
            "feed_fetch_errors_total",
            "Sources that failed (network, status or xml)."
        );
        describe_histogram!("feed_fetch_ms", "Feed fetch + parse time in milliseconds.");
        describe_counter!(
            "pipeline_entries_total",
            "Entries produced by pipeline runs."
        );
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Fetch one source. Failures are logged and turned into an empty list.
pub async fn fetch_source(
    client: &dyn FeedClient,
    source: &FeedSource,
    max_items: usize,
) -> Option<Vec<RawItem>> {
    match client.fetch_items(source, max_items).await {
        Ok(mut items) => {
            items.truncate(max_items);
            counter!("feed_items_total").increment(items.len() as u64);
            Some(items)
        }
        Err(e) => {
            tracing::warn!(
                target: "ingest",
                error = %e,
                source = %source.name,
                url = %source.url,
                "source fetch failed"
            );
            counter!("feed_fetch_errors_total").increment(1);
            None
        }
    }
}

/// Fetch every source concurrently; results come back in source order.
/// `None` marks a failed source.
pub async fn fetch_all(
    client: &dyn FeedClient,
    sources: &[FeedSource],
    max_items: usize,
) -> Vec<(FeedSource, Option<Vec<RawItem>>)> {
    ensure_metrics_described();

    let fetches = sources
        .iter()
        .map(|s| async move { (s.clone(), fetch_source(client, s, max_items).await) });
    futures::future::join_all(fetches).await
}
