// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod categorize;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::categorize::{Categorizer, Category, CategoryRules};
pub use crate::config::{load_config_default, BriefedConfig};
pub use crate::ingest::types::{FeedClient, FeedSource, FetchError, RawItem};
pub use crate::pipeline::{Entry, Pipeline};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, falling back to info for this crate and its
/// `ingest`/`pipeline` targets, warn elsewhere.
/// `BRIEFED_LOG_JSON=1` switches to JSON lines (for CI logs).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("briefed=info,ingest=info,pipeline=info,warn"));

    let json = std::env::var("BRIEFED_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}
