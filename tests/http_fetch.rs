// tests/http_fetch.rs
//
// Real HTTP against a loopback axum server: success, non-2xx, timeout.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use briefed::ingest::http::HttpFeedClient;
use briefed::{CategoryRules, FeedClient, FeedSource, FetchError, Pipeline};

const MARKETING_XML: &str = include_str!("fixtures/marketing_rss.xml");

async fn spawn_feed_server() -> SocketAddr {
    let app = Router::new()
        .route("/feed", get(|| async { MARKETING_XML }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "not here") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                MARKETING_XML
            }),
        )
        .route("/html", get(|| async { "<html><body>oops</body></html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source(addr: SocketAddr, path: &str) -> FeedSource {
    FeedSource::new(path.trim_start_matches('/'), format!("http://{addr}{path}"))
}

#[tokio::test]
async fn fetches_and_caps_items() {
    let addr = spawn_feed_server().await;
    let client = HttpFeedClient::new();
    let items = client.fetch_items(&source(addr, "/feed"), 2).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].title, "Survey: CMOs plan bigger retail media budgets");
}

#[tokio::test]
async fn non_2xx_is_a_status_error() {
    let addr = spawn_feed_server().await;
    let err = HttpFeedClient::new()
        .fetch_items(&source(addr, "/missing"), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn slow_feed_hits_the_timeout() {
    let addr = spawn_feed_server().await;
    let client = HttpFeedClient::new().with_timeout(Duration::from_millis(200));
    let err = client
        .fetch_items(&source(addr, "/slow"), 5)
        .await
        .unwrap_err();
    match err {
        FetchError::Request { source, .. } => assert!(source.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn html_body_is_an_xml_error() {
    let addr = spawn_feed_server().await;
    let err = HttpFeedClient::new()
        .fetch_items(&source(addr, "/html"), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Xml(_)));
}

#[tokio::test]
async fn pipeline_over_http_skips_broken_sources() {
    let addr = spawn_feed_server().await;
    let client = HttpFeedClient::new().with_timeout(Duration::from_millis(300));
    let pipeline = Pipeline::new(
        vec![
            source(addr, "/missing"),
            source(addr, "/slow"),
            source(addr, "/feed"),
            source(addr, "/html"),
        ],
        Arc::new(client),
        &CategoryRules::default_seed(),
    )
    .unwrap();

    let (entries, stats) = pipeline.run_with_stats().await;
    assert_eq!(stats.failed_sources, 3);
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().all(|e| e.source == "feed"));
}
