mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;
use lhfcrawler::scanner::{Scanner, XssProbe};

fn probe(payloads: &[&str]) -> XssProbe {
    XssProbe::new(
        payloads.iter().map(|p| p.to_string()).collect(),
        true,
        Duration::from_secs(3),
    ).unwrap()
}

#[tokio::test]
async fn test_reflected_payload_reports_encoded_url() {
    let addr = common::spawn_server(common::reflecting_router()).await;
    let url = format!("http://{}/a?x=1", addr);

    let reflection = probe(&["<s>1</s>"]).probe(&url).await.unwrap().unwrap();
    assert_eq!(reflection.payload, "<s>1</s>");
    assert_eq!(
        reflection.vulnerable_url,
        format!("http://{}/a?x=%3Cs%3E1%3C%2Fs%3E", addr)
    );
}

#[tokio::test]
async fn test_first_reflecting_payload_wins() {
    let addr = common::spawn_server(common::reflecting_router()).await;
    let url = format!("http://{}/filtered?q=hello", addr);

    let scanner = probe(&["<script>alert(1)</script>", "<b>x</b>", "<i>y</i>"]);
    let reflection = scanner.probe(&url).await.unwrap().unwrap();
    assert_eq!(reflection.payload, "<b>x</b>");
}

#[tokio::test]
async fn test_every_param_carries_the_payload() {
    let addr = common::spawn_server(common::reflecting_router()).await;
    let url = format!("http://{}/echo?a=1&b=2&empty=#frag", addr);

    let reflection = probe(&["<z>"]).probe(&url).await.unwrap().unwrap();
    assert_eq!(
        reflection.vulnerable_url,
        format!("http://{}/echo?a=%3Cz%3E&b=%3Cz%3E#frag", addr)
    );
}

#[tokio::test]
async fn test_no_reflection_is_none() {
    let addr = common::spawn_server(common::reflecting_router()).await;
    let url = format!("http://{}/static?q=1", addr);
    assert!(probe(&["<x>", "<y>"]).probe(&url).await.unwrap().is_none());
}

#[tokio::test]
async fn test_probe_is_repeatable() {
    let addr = common::spawn_server(common::reflecting_router()).await;
    let scanner = probe(&["nope'", "<u>"]);
    let url = format!("http://{}/filtered?q=1", addr);

    let first = scanner.probe(&url).await.unwrap();
    let second = scanner.probe(&url).await.unwrap();
    assert_eq!(first, second);
    assert!(first.is_some());
}

#[tokio::test]
async fn test_url_without_params_makes_no_request() {
    // Nothing listens on this port; a request would surface as an error
    let result = probe(&["<x>"]).probe("http://127.0.0.1:9/echo").await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_plain_http_failure_retries_once_over_https() {
    let (addr, accepted) = common::spawn_closing_listener().await;
    let url = format!("http://{}/x?q=1", addr);

    let err = probe(&["<x>"]).probe(&url).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err}");
    assert_eq!(accepted.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_https_failure_is_not_retried() {
    let (addr, accepted) = common::spawn_closing_listener().await;
    let url = format!("https://{}/x?q=1", addr);

    let err = probe(&["<x>"]).probe(&url).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err}");
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
