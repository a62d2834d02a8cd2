// src/api.rs
//! Preview server: serves the latest snapshot as a page and as JSON.

use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::pipeline::{Entry, Pipeline, RunStats};
use crate::render::render_page;

/// Result of the last pipeline run.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entries: Vec<Entry>,
    pub stats: RunStats,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    page_title: Arc<str>,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, page_title: &str, initial: Snapshot) -> Self {
        Self {
            pipeline,
            page_title: Arc::from(page_title),
            snapshot: Arc::new(RwLock::new(initial)),
        }
    }

    /// Run the pipeline and swap the snapshot. The lock is not held across the run.
    pub async fn refresh(&self) -> RunStats {
        let (entries, stats) = self.pipeline.run_with_stats().await;
        let snap = Snapshot {
            entries,
            stats: stats.clone(),
            generated_at: Utc::now(),
        };
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snap,
            Err(poisoned) => *poisoned.into_inner() = snap,
        }
        stats
    }

    pub fn snapshot(&self) -> Snapshot {
        match self.snapshot.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/health", get(|| async { "ok" }))
        .route("/api/entries", get(entries))
        .route("/api/refresh", post(refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn page(State(state): State<AppState>) -> Html<String> {
    let snap = state.snapshot();
    Html(render_page(&state.page_title, &snap.entries, snap.generated_at))
}

async fn entries(State(state): State<AppState>) -> Json<Vec<Entry>> {
    Json(state.snapshot().entries)
}

async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.refresh().await;
    (StatusCode::OK, Json(stats))
}
