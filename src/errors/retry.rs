use std::time::Duration;
use std::future::Future;

use super::types::ScanError;
use tracing::warn;

/// Retry configuration for upstream queries.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    /// Linear step: the wait after attempt `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryConfig {
    /// Wait before the next attempt, after `attempt` (1-indexed) attempts failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

/// Execute an async operation with retry logic.
///
/// Retries only if the error is classified as retryable and we haven't
/// used up `max_attempts`.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    mut factory: F,
) -> Result<T, ScanError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScanError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match factory().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let classification = e.classify();

                if !classification.retryable || attempt >= max_attempts {
                    if !classification.retryable {
                        warn!(
                            operation = operation_name,
                            error_type = classification.error_type,
                            "Non-retryable error, failing immediately"
                        );
                    } else {
                        warn!(
                            operation = operation_name,
                            attempt,
                            max = max_attempts,
                            "Max retries exhausted"
                        );
                    }
                    return Err(e);
                }

                let delay = config.delay(attempt);
                warn!(
                    operation = operation_name,
                    attempt,
                    max = max_attempts,
                    error_type = classification.error_type,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "Retrying after error"
                );

                tokio::time::sleep(delay).await;
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ScanError::Internal("Retry loop exited unexpectedly".into())))
}
