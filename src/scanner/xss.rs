use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use crate::errors::ScanError;
use crate::errors::classification::from_request_error;
use crate::models::Reflection;
use super::Scanner;
use super::query::{https_fallback, inject, injectable_params};
use tracing::debug;

/// Reflected XSS probe: injects each payload into every query parameter and
/// reports the first payload echoed verbatim in a response body.
pub struct XssProbe {
    client: Client,
    payloads: Arc<Vec<String>>,
}

impl XssProbe {
    pub fn new(payloads: Vec<String>, verify_tls: bool, timeout: Duration) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;
        Ok(Self::with_client(client, payloads))
    }

    pub fn with_client(client: Client, payloads: Vec<String>) -> Self {
        Self {
            client,
            payloads: Arc::new(payloads),
        }
    }

    async fn fetch(&self, url: &Url) -> Result<String, ScanError> {
        let response = self.client
            .get(url.clone())
            .send()
            .await
            .map_err(from_request_error)?;
        response.text().await.map_err(from_request_error)
    }

    /// One payload trial: the injected URL, then its https equivalent if the
    /// plain-HTTP request failed at transport level.
    async fn trial(&self, injected: Url, payload: &str) -> Result<Option<Reflection>, ScanError> {
        let (url, body) = match self.fetch(&injected).await {
            Ok(body) => (injected, body),
            Err(e) => {
                let Some(secure) = https_fallback(&injected) else {
                    return Err(e);
                };
                debug!(url = %injected, error = %e, "Request failed, retrying over https");
                let body = self.fetch(&secure).await?;
                (secure, body)
            }
        };

        if body.contains(payload) {
            Ok(Some(Reflection {
                vulnerable_url: url.to_string(),
                payload: payload.to_string(),
            }))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl Scanner for XssProbe {
    async fn probe(&self, url: &str) -> Result<Option<Reflection>, ScanError> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(url, error = %e, "Skipping unparsable URL");
                return Ok(None);
            }
        };

        let params = injectable_params(&parsed);
        if params.is_empty() {
            return Ok(None);
        }

        for (index, payload) in self.payloads.iter().enumerate() {
            let injected = inject(&parsed, &params, payload);
            match self.trial(injected, payload).await {
                Ok(Some(reflection)) => return Ok(Some(reflection)),
                Ok(None) => {}
                // The first trial failing on every scheme means the host is unreachable
                Err(e) if index == 0 => return Err(e),
                Err(e) => {
                    debug!(url, payload = %payload, error = %e, "Payload trial failed, moving on");
                }
            }
        }

        Ok(None)
    }

    fn scanner_name(&self) -> &str {
        "xss"
    }
}
