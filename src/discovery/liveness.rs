use std::time::Duration;
use futures::{stream, StreamExt};
use reqwest::{redirect::Policy, Client, StatusCode};
use crate::errors::ScanError;
use tracing::{debug, info};

pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

const LIVE_STATUSES: [StatusCode; 3] = [StatusCode::OK, StatusCode::MOVED_PERMANENTLY, StatusCode::FOUND];

pub fn liveness_client(verify_tls: bool) -> Result<Client, ScanError> {
    Ok(Client::builder()
        .timeout(LIVENESS_TIMEOUT)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(!verify_tls)
        .build()?)
}

/// First of `https://<domain>` and `http://<domain>` answering 200, 301 or 302.
pub async fn is_live(client: &Client, domain: &str) -> Option<String> {
    for scheme in ["https", "http"] {
        let url = format!("{}://{}", scheme, domain);
        match client.get(&url).send().await {
            Ok(response) if LIVE_STATUSES.contains(&response.status()) => return Some(url),
            Ok(response) => debug!(url = %url, status = %response.status(), "Not live"),
            Err(e) => debug!(url = %url, error = %e, "Liveness request failed"),
        }
    }
    None
}

/// Keep the live domains, preserving input order. At most `concurrency`
/// checks run at once.
pub async fn filter_live(client: &Client, domains: Vec<String>, concurrency: usize) -> Vec<String> {
    let total = domains.len();
    let mut live: Vec<(usize, String)> = stream::iter(domains.into_iter().enumerate())
        .map(|(index, domain)| async move {
            is_live(client, &domain).await.map(|_| (index, domain))
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|d| async move { d })
        .collect()
        .await;
    live.sort_by_key(|(index, _)| *index);
    let live: Vec<String> = live.into_iter().map(|(_, domain)| domain).collect();
    info!(live = live.len(), total, "Liveness check complete");
    live
}
