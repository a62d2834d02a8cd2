// src/pipeline.rs
//! Fetch → summarize → sort → date → categorize.
//!
//! A run never fails: bad sources contribute nothing, bad dates sort last
//! and render as an empty display date. Configuration problems are caught
//! earlier, when the `Pipeline` is built.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use crate::categorize::{Categorizer, Category, CategoryRules};
use crate::config::BriefedConfig;
use crate::ingest::http::HttpFeedClient;
use crate::ingest::types::{FeedClient, FeedSource, RawItem};
use crate::summarize::{summarize, DEFAULT_SUMMARY_SENTENCES, SUMMARY_PLACEHOLDER};

pub const DEFAULT_ITEMS_PER_SOURCE: usize = 5;

/// One summarized, dated, categorized article, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published_raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub summary: String,
    pub display_date: String, // "02 Jan 2025", empty if the date did not parse
    #[serde(serialize_with = "serialize_sorted")]
    pub categories: HashSet<Category>,
}

fn serialize_sorted<S: serde::Serializer>(
    set: &HashSet<Category>,
    ser: S,
) -> Result<S::Ok, S::Error> {
    let mut v: Vec<&Category> = set.iter().collect();
    v.sort();
    ser.collect_seq(v)
}

impl Entry {
    /// Categories in tab order, for stable output.
    pub fn sorted_categories(&self) -> Vec<Category> {
        let mut v: Vec<Category> = self.categories.iter().copied().collect();
        v.sort();
        v
    }
}

/// Parse RFC 2822 (feeds) or RFC 3339 (Atom-ish dc:date). `None` if neither.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Day, short month, 4-digit year.
pub fn display_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

/// Run summary, mostly for logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub sources: usize,
    pub failed_sources: usize,
    pub entries: usize,
}

pub struct Pipeline {
    sources: Vec<FeedSource>,
    client: Arc<dyn FeedClient>,
    categorizer: Categorizer,
    items_per_source: usize,
    summary_sentences: usize,
}

impl Pipeline {
    pub fn new(
        sources: Vec<FeedSource>,
        client: Arc<dyn FeedClient>,
        rules: &CategoryRules,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            sources,
            client,
            categorizer: Categorizer::new(rules)?,
            items_per_source: DEFAULT_ITEMS_PER_SOURCE,
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
        })
    }

    /// Production wiring: HTTP client with the configured timeout and user agent.
    pub fn from_config(cfg: &BriefedConfig) -> anyhow::Result<Self> {
        let client = HttpFeedClient::new()
            .with_timeout(cfg.pipeline.timeout())
            .with_user_agent(cfg.pipeline.user_agent.clone());
        Ok(Self::new(cfg.sources.clone(), Arc::new(client), &cfg.categories)?
            .with_items_per_source(cfg.pipeline.items_per_source)
            .with_summary_sentences(cfg.pipeline.summary_sentences))
    }

    pub fn with_items_per_source(mut self, n: usize) -> Self {
        self.items_per_source = n;
        self
    }

    pub fn with_summary_sentences(mut self, m: usize) -> Self {
        self.summary_sentences = m;
        self
    }

    /// Full run. The entry list is rebuilt from scratch every time.
    pub async fn run(&self) -> Vec<Entry> {
        self.run_with_stats().await.0
    }

    pub async fn run_with_stats(&self) -> (Vec<Entry>, RunStats) {
        let fetched =
            crate::ingest::fetch_all(self.client.as_ref(), &self.sources, self.items_per_source)
                .await;

        let mut stats = RunStats {
            sources: fetched.len(),
            ..Default::default()
        };

        let mut entries = Vec::new();
        for (source, items) in fetched {
            let Some(items) = items else {
                stats.failed_sources += 1;
                continue;
            };
            entries.extend(
                items
                    .into_iter()
                    .map(|it| self.build_entry(&source.name, it)),
            );
        }

        sort_by_recency(&mut entries);

        for e in entries.iter_mut() {
            e.display_date = display_date(e.published_at);
            let text = format!("{} {}", e.title, e.summary).to_lowercase();
            e.categories = self.categorizer.categorize(&e.source, &text);
        }

        stats.entries = entries.len();
        counter!("pipeline_entries_total").increment(entries.len() as u64);
        gauge!("pipeline_last_run_ts").set(Utc::now().timestamp() as f64);
        tracing::info!(
            target: "pipeline",
            sources = stats.sources,
            failed_sources = stats.failed_sources,
            entries = stats.entries,
            "pipeline run finished"
        );

        (entries, stats)
    }

    fn build_entry(&self, source: &str, item: RawItem) -> Entry {
        let mut summary = summarize(&item.description_raw, self.summary_sentences);
        if summary.is_empty() {
            summary = SUMMARY_PLACEHOLDER.to_string();
        }
        let published_at = parse_published(&item.published_raw);
        if published_at.is_none() && !item.published_raw.trim().is_empty() {
            tracing::debug!(
                target: "pipeline",
                source,
                raw = %item.published_raw,
                "unparseable publication date"
            );
        }
        Entry {
            source: source.to_string(),
            title: item.title,
            link: item.link,
            published_raw: item.published_raw,
            published_at,
            summary,
            display_date: String::new(),
            categories: HashSet::new(),
        }
    }
}

/// Newest first; undated entries last. Stable, so ties keep fetch order.
pub fn sort_by_recency(entries: &mut [Entry]) {
    entries.sort_by_key(|e| Reverse(e.published_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc2822_with_obsolete_zone_and_rfc3339() {
        let a = parse_published("Wed, 01 Jan 2025 00:00:00 GMT").unwrap();
        let b = parse_published("2025-01-01T00:00:00Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_published("yesterday-ish").is_none());
        assert!(parse_published("   ").is_none());
    }

    #[test]
    fn display_date_format() {
        let ts = parse_published("Thu, 02 Jan 2025 15:30:00 +0200");
        assert_eq!(display_date(ts), "02 Jan 2025");
        assert_eq!(display_date(None), "");
    }
}
