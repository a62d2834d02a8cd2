// src/bin/briefed_serve.rs
//! Local preview: run the pipeline once, serve the result, refresh on POST.
//!
//! Usage: `BRIEFED_ADDR=127.0.0.1:8080 cargo run --bin briefed-serve`

use anyhow::Context;
use briefed::api::{AppState, Snapshot};
use briefed::metrics::Metrics;
use briefed::{load_config_default, Pipeline};
use std::sync::Arc;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    briefed::init_tracing();

    let metrics = Metrics::init()?;
    let cfg = load_config_default().context("loading briefed config")?;
    let pipeline = Arc::new(Pipeline::from_config(&cfg)?);

    let (entries, stats) = pipeline.run_with_stats().await;
    let state = AppState::new(
        pipeline,
        &cfg.pipeline.page_title,
        Snapshot {
            entries,
            stats,
            generated_at: chrono::Utc::now(),
        },
    );
    let app = briefed::router(state).merge(metrics.router());

    let addr = std::env::var("BRIEFED_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "preview server listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
