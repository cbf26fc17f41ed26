#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

/// Serve `router` on an ephemeral loopback port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A loopback port that accepts every connection and closes it at once.
/// The counter tracks accepted connections.
pub async fn spawn_closing_listener() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });
    (addr, accepted)
}

/// `/echo` reflects every query value, `/filtered` reflects them with
/// `script` neutralized, `/static` never reflects.
pub fn reflecting_router() -> Router {
    Router::new()
        .route("/echo", get(echo))
        .route("/a", get(echo))
        .route("/filtered", get(filtered))
        .route("/static", get(|| async { Html("<p>nothing to see</p>") }))
}

async fn echo(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let mut values: Vec<_> = params.into_values().collect();
    values.sort();
    Html(format!("<html><body>{}</body></html>", values.join(" ")))
}

async fn filtered(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let values: Vec<_> = params.into_values().map(|v| v.replace("script", "blocked")).collect();
    Html(format!("<html><body>{}</body></html>", values.join(" ")))
}
