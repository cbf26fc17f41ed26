use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use crate::errors::ScanError;
use crate::models::{Finding, Reflection};
use crate::scanner::Scanner;
use super::pool::drive;
use tracing::{debug, error, info, warn};

/// Side effect run for every accepted finding, under the domain lock. A panic
/// here is caught and counted against the error budget.
pub type HitCallback = Arc<dyn Fn(&Finding) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainLimits {
    /// Failed probes tolerated before the remaining URLs are skipped.
    pub max_errors: usize,
    /// Findings kept before the remaining URLs are skipped. `None` is unlimited.
    pub max_findings: Option<usize>,
    /// URL-tier pool width.
    pub workers: usize,
}

/// Result of scanning one domain.
#[derive(Debug, Clone, Default)]
pub struct DomainScanReport {
    pub findings: Vec<Finding>,
    pub errors: usize,
    /// Probes that actually ran.
    pub probed: usize,
    pub total_urls: usize,
    /// True when the error budget or the findings cap stopped dispatch early.
    pub stopped_early: bool,
}

#[derive(Default)]
struct DomainTally {
    errors: usize,
    hits: usize,
    probed: usize,
    findings: Vec<Finding>,
}

struct DomainScan {
    domain: String,
    limits: DomainLimits,
    cancel: CancellationToken,
    tally: Mutex<DomainTally>,
    on_hit: HitCallback,
}

impl DomainScan {
    fn tally(&self) -> MutexGuard<'_, DomainTally> {
        self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_error(&self, url: &str, error: &ScanError) {
        let mut tally = self.tally();
        tally.probed += 1;
        debug!(domain = %self.domain, url, error = %error, errors = tally.errors + 1, "Probe failed");
        self.count_error(&mut tally);
    }

    fn count_error(&self, tally: &mut DomainTally) {
        tally.errors += 1;
        if tally.errors >= self.limits.max_errors && !self.cancel.is_cancelled() {
            self.cancel.cancel();
            warn!(
                domain = %self.domain,
                errors = tally.errors,
                max_errors = self.limits.max_errors,
                "Error budget exhausted, skipping remaining URLs"
            );
        }
    }

    fn record_clean(&self) {
        self.tally().probed += 1;
    }

    fn record_hit(&self, reflection: Reflection) {
        let mut tally = self.tally();
        tally.probed += 1;

        if self.limits.max_findings.is_some_and(|max| tally.hits >= max) {
            debug!(domain = %self.domain, url = %reflection.vulnerable_url, "Findings cap reached, dropping late hit");
            return;
        }

        let finding = Finding::new(&self.domain, reflection);
        let delivered = catch_unwind(AssertUnwindSafe(|| (self.on_hit)(&finding)));
        if delivered.is_err() {
            error!(domain = %self.domain, url = %finding.vulnerable_url, "Hit callback panicked");
            self.count_error(&mut tally);
        }
        tally.findings.push(finding);
        tally.hits += 1;

        if let Some(max) = self.limits.max_findings {
            if tally.hits >= max && !self.cancel.is_cancelled() {
                self.cancel.cancel();
                info!(domain = %self.domain, hits = tally.hits, "Findings cap reached, skipping remaining URLs");
            }
        }
    }
}

/// Probe every URL of `domain` through a `limits.workers`-wide pool.
///
/// Cancelling `cancel` (or hitting the error budget or findings cap, which
/// cancel it) stops new probes; probes in flight finish and are still counted.
/// Every probe holds a `request_limit` permit while it runs.
pub async fn scan_domain(
    domain: &str,
    urls: Vec<String>,
    scanner: Arc<dyn Scanner>,
    limits: DomainLimits,
    cancel: CancellationToken,
    request_limit: Arc<Semaphore>,
    on_hit: HitCallback,
) -> DomainScanReport {
    let total_urls = urls.len();
    let scan = Arc::new(DomainScan {
        domain: domain.to_string(),
        limits,
        cancel: cancel.clone(),
        tally: Mutex::new(DomainTally::default()),
        on_hit,
    });

    let handler = {
        let scan = scan.clone();
        move |url: String| {
            let scan = scan.clone();
            let scanner = scanner.clone();
            let request_limit = request_limit.clone();
            async move {
                // A closed semaphore only drops the cap
                let _permit = request_limit.acquire_owned().await.ok();
                if scan.cancel.is_cancelled() {
                    return;
                }

                let probe_url = url.clone();
                let outcome = tokio::spawn(async move { scanner.probe(&probe_url).await }).await;
                match outcome {
                    Ok(Ok(Some(reflection))) => scan.record_hit(reflection),
                    Ok(Ok(None)) => scan.record_clean(),
                    Ok(Err(e)) => scan.record_error(&url, &e),
                    Err(join_error) => {
                        let e = ScanError::Internal(format!("probe task failed: {}", join_error));
                        scan.record_error(&url, &e);
                    }
                }
            }
        }
    };

    let pool = drive(urls, limits.workers, cancel.clone(), handler).await;
    debug!(domain, dispatched = pool.dispatched, total = pool.total, "URL pool drained");

    let tally = std::mem::take(&mut *scan.tally());
    DomainScanReport {
        stopped_early: pool.dispatched < pool.total || tally.probed < total_urls,
        findings: tally.findings,
        errors: tally.errors,
        probed: tally.probed,
        total_urls,
    }
}
