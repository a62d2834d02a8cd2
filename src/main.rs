// src/main.rs
//! Briefed: one-shot page build.
//! Loads the feed config, runs the pipeline once and writes the static page.
//!
//! Exit code is non-zero only for configuration or output-file problems;
//! feeds that fail are logged and skipped.

use anyhow::Context;
use briefed::{load_config_default, render::render_page, Pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    briefed::init_tracing();

    let cfg = load_config_default().context("loading briefed config")?;
    let pipeline = Pipeline::from_config(&cfg)?;

    let (entries, stats) = pipeline.run_with_stats().await;
    if stats.failed_sources == stats.sources {
        tracing::warn!(sources = stats.sources, "every source failed, page will be empty");
    }

    let html = render_page(&cfg.pipeline.page_title, &entries, chrono::Utc::now());
    let out = &cfg.pipeline.output_path;
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output dir {}", dir.display()))?;
    }
    std::fs::write(out, html).with_context(|| format!("writing {}", out.display()))?;

    tracing::info!(
        path = %out.display(),
        entries = entries.len(),
        failed_sources = stats.failed_sources,
        "page written"
    );
    Ok(())
}
