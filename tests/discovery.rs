mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use lhfcrawler::discovery::{filter_live, is_live, liveness_client, CrtShSource, DomainCache, DomainSource};
use lhfcrawler::errors::RetryConfig;

const CRTSH_BODY: &str = r#"[
    {"name_value": "shop.example.hu\n*.example.hu"},
    {"name_value": "mail.example.hu\nshop.example.hu"},
    {"name_value": "example.com"}
]"#;

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay: Duration::from_millis(5),
    }
}

async fn crtsh_server(status: StatusCode, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/", get(move |State(hits): State<Arc<AtomicUsize>>| async move {
            hits.fetch_add(1, Ordering::SeqCst);
            (status, body)
        }))
        .with_state(hits.clone());
    let addr = common::spawn_server(router).await;
    (format!("http://{}", addr), hits)
}

#[tokio::test]
async fn test_discovery_parses_and_caches() {
    let dir = tempfile::tempdir().unwrap();
    let (base, hits) = crtsh_server(StatusCode::OK, CRTSH_BODY).await;

    let source = CrtShSource::new(DomainCache::new(dir.path()))
        .unwrap()
        .with_base_url(base)
        .with_retry(fast_retry(3));
    let domains = source.discover("hu", 10, false).await;

    assert_eq!(domains, vec!["shop.example.hu", "example.hu", "mail.example.hu"]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(DomainCache::new(dir.path()).path_for("hu").exists());
}

#[tokio::test]
async fn test_cache_is_used_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let (base, hits) = crtsh_server(StatusCode::OK, CRTSH_BODY).await;
    let source = CrtShSource::new(DomainCache::new(dir.path()))
        .unwrap()
        .with_base_url(base)
        .with_retry(fast_retry(1));

    source.discover("hu", 10, false).await;
    let cached = source.discover("hu", 2, true).await;

    assert_eq!(cached, vec!["shop.example.hu", "example.hu"]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_failure_retries_then_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (base, hits) = crtsh_server(StatusCode::SERVICE_UNAVAILABLE, "<html>busy</html>").await;

    let source = CrtShSource::new(DomainCache::new(dir.path()))
        .unwrap()
        .with_base_url(base)
        .with_retry(fast_retry(3));
    let domains = source.discover("hu", 10, false).await;

    assert!(domains.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(!DomainCache::new(dir.path()).path_for("hu").exists());
}

#[tokio::test]
async fn test_corrupt_cache_falls_back_to_query() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DomainCache::new(dir.path());
    std::fs::write(cache.path_for("hu"), "{not json").unwrap();

    let (base, hits) = crtsh_server(StatusCode::OK, CRTSH_BODY).await;
    let source = CrtShSource::new(cache)
        .unwrap()
        .with_base_url(base)
        .with_retry(fast_retry(1));

    let domains = source.discover("hu", 10, true).await;
    assert_eq!(domains.len(), 3);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

/// Answers `/` with `status` after `delay_ms`, counting plain-HTTP requests.
async fn status_server(status: StatusCode, delay_ms: u64) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/", get(move |State(hits): State<Arc<AtomicUsize>>| async move {
            hits.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if status.is_redirection() {
                (status, [(header::LOCATION, "/next")]).into_response()
            } else {
                status.into_response()
            }
        }))
        .with_state(hits.clone());
    let addr = common::spawn_server(router).await;
    (addr.to_string(), hits)
}

#[tokio::test]
async fn test_redirect_without_following_is_live_over_http() {
    let client = liveness_client(true).unwrap();
    for status in [StatusCode::MOVED_PERMANENTLY, StatusCode::FOUND, StatusCode::OK] {
        let (host, hits) = status_server(status, 0).await;
        assert_eq!(is_live(&client, &host).await, Some(format!("http://{}", host)));
        assert_eq!(hits.load(Ordering::SeqCst), 1, "redirect to /next must not be followed");
    }
}

#[tokio::test]
async fn test_not_found_is_not_live() {
    let client = liveness_client(true).unwrap();
    let (host, hits) = status_server(StatusCode::NOT_FOUND, 0).await;
    assert_eq!(is_live(&client, &host).await, None);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_filter_live_keeps_order_around_slow_domain() {
    let client = liveness_client(true).unwrap();
    let (slow, _) = status_server(StatusCode::OK, 1500).await;
    let (fast, fast_hits) = status_server(StatusCode::OK, 0).await;
    let (missing, _) = status_server(StatusCode::NOT_FOUND, 0).await;

    let mut domains = vec![slow.clone(), fast.clone(), missing.clone()];
    domains.extend(std::iter::repeat(fast.clone()).take(3));

    let (live, fast_by_1s) = tokio::join!(filter_live(&client, domains, 2), async {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        fast_hits.load(Ordering::SeqCst)
    });

    assert_eq!(fast_by_1s, 4);
    assert_eq!(live, vec![slow, fast.clone(), fast.clone(), fast.clone(), fast]);
}
