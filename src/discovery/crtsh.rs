//! crt.sh certificate-transparency domain discovery.
//!
//! API: https://crt.sh/?q=%25.<tld>&output=json

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use crate::errors::{ScanError, RetryConfig, with_retry};
use crate::errors::classification::from_request_error;
use super::DomainSource;
use super::cache::DomainCache;
use tracing::{info, warn};

pub const CRTSH_BASE_URL: &str = "https://crt.sh";
const CRTSH_TIMEOUT: Duration = Duration::from_secs(30);

static HOSTNAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9_](?:[A-Za-z0-9_-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9-]{1,63}$").ok()
});

#[derive(Debug, Deserialize)]
struct CertEntry {
    #[serde(default)]
    name_value: String,
}

pub struct CrtShSource {
    client: Client,
    base_url: String,
    cache: DomainCache,
    retry: RetryConfig,
}

impl CrtShSource {
    pub fn new(cache: DomainCache) -> Result<Self, ScanError> {
        let client = Client::builder().timeout(CRTSH_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: CRTSH_BASE_URL.to_string(),
            cache,
            retry: RetryConfig::default(),
        })
    }

    /// Point at another crt.sh-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn query_url(&self, tld: &str) -> String {
        let query = if is_all(tld) { "*".to_string() } else { format!("%25.{}", tld) };
        format!("{}/?q={}&output=json", self.base_url, query)
    }

    async fn fetch_entries(&self, url: &str) -> Result<Vec<CertEntry>, ScanError> {
        let response = self.client.get(url).send().await.map_err(from_request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(from_request_error)?;

        let trimmed = body.trim_start();
        if !status.is_success() || !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
            return Err(ScanError::Upstream(format!("crt.sh returned {} with a non-JSON body", status)));
        }

        // A single object is a one-entry result
        if trimmed.starts_with('{') {
            return Ok(vec![serde_json::from_str(trimmed)
                .map_err(|e| ScanError::Upstream(format!("malformed crt.sh entry: {}", e)))?]);
        }
        serde_json::from_str(trimmed)
            .map_err(|e| ScanError::Upstream(format!("malformed crt.sh response: {}", e)))
    }
}

#[async_trait]
impl DomainSource for CrtShSource {
    async fn discover(&self, tld: &str, limit: usize, use_cache: bool) -> Vec<String> {
        if use_cache {
            if let Some(cached) = self.cache.load(tld, limit).await {
                return cached;
            }
        }

        info!(tld, "Querying crt.sh");
        let url = self.query_url(tld);
        match with_retry("crt.sh query", &self.retry, || self.fetch_entries(&url)).await {
            Ok(entries) => {
                let domains = extract_domains(&entries, tld, limit);
                info!(tld, count = domains.len(), "crt.sh domains discovered");
                self.cache.store(tld, &domains).await;
                domains
            }
            Err(e) => {
                warn!(tld, attempts = self.retry.max_attempts, error = %e, "crt.sh request failed after retries");
                Vec::new()
            }
        }
    }
}

/// Syntactically valid DNS hostname (labels of letters, digits, `-` and `_`).
pub fn is_hostname(name: &str) -> bool {
    HOSTNAME.as_ref().is_some_and(|re| re.is_match(name))
}

fn is_all(tld: &str) -> bool {
    tld.eq_ignore_ascii_case("all")
}

/// Names from certificate entries that belong to `tld`, first-seen order.
fn extract_domains(entries: &[CertEntry], tld: &str, limit: usize) -> Vec<String> {
    let suffix = format!(".{}", tld);
    let mut seen = HashSet::new();
    let mut domains = Vec::new();

    for entry in entries {
        for name in entry.name_value.split('\n') {
            if domains.len() >= limit {
                return domains;
            }
            let name = name.trim();
            let name = name.strip_prefix("*.").unwrap_or(name);
            if !(is_all(tld) || name.ends_with(&suffix)) || !is_hostname(name) {
                continue;
            }
            if seen.insert(name.to_string()) {
                domains.push(name.to_string());
            }
        }
    }
    domains
}
