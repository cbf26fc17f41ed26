use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use futures::{stream, StreamExt};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::config::{InterruptPolicy, RunConfig};
use crate::errors::ScanError;
use crate::harvest::UrlHarvester;
use crate::models::{Finding, ScanStatus};
use crate::progress::{PlainReporter, StatusReporter};
use crate::reporting::{write_reports, ReportPaths};
use crate::scanner::Scanner;
use crate::utils::formatting::format_elapsed;
use super::domain::{scan_domain, DomainLimits, HitCallback};
use super::pool::drive;
use super::state::StatusBoard;
use tracing::{error, info, warn};

/// How often the live status view is redrawn.
pub const STATUS_REFRESH: Duration = Duration::from_millis(250);

const SHUTDOWN_MESSAGE: &str = "Shutdown requested (Ctrl+C). Exiting gracefully...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed {
        findings: Vec<Finding>,
        reports: ReportPaths,
    },
    Interrupted {
        /// Findings confirmed before the interrupt.
        confirmed: usize,
        /// Written only under `InterruptPolicy::FlushPartial`.
        reports: Option<ReportPaths>,
    },
}

type Harvested = Vec<(String, Vec<String>)>;

/// Harvest, scan, aggregate and report over a list of domains.
pub struct RunOrchestrator {
    config: RunConfig,
    scanner: Arc<dyn Scanner>,
    harvester: Arc<UrlHarvester>,
    reporter: Arc<dyn StatusReporter>,
    board: StatusBoard,
    cancel_token: CancellationToken,
    request_limit: Arc<Semaphore>,
}

impl RunOrchestrator {
    pub fn new(config: RunConfig, scanner: Arc<dyn Scanner>, harvester: Arc<UrlHarvester>) -> Self {
        let request_limit = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
        Self {
            config,
            scanner,
            harvester,
            reporter: Arc::new(PlainReporter::new()),
            board: StatusBoard::new(),
            cancel_token: CancellationToken::new(),
            request_limit,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the run's shutdown token with an external one, e.g. one
    /// cancelled by a Ctrl+C handler.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn status_board(&self) -> StatusBoard {
        self.board.clone()
    }

    pub async fn run(&self, domains: Vec<String>) -> Result<RunOutcome, ScanError> {
        let started = Instant::now();
        let domains = dedupe(domains);
        info!(
            run_id = %self.config.run_id,
            domains = domains.len(),
            scanner = self.scanner.scanner_name(),
            "Run started"
        );

        let confirmed: Arc<Mutex<Vec<Finding>>> = Arc::new(Mutex::new(Vec::new()));

        let harvested = tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => return self.interrupted(&confirmed).await,
            harvested = self.harvest_all(&domains) => harvested,
        };

        let mut targets = Vec::new();
        for (domain, urls) in harvested {
            if urls.is_empty() {
                info!(domain = %domain, "No candidate URLs, skipping");
                continue;
            }
            self.board.register(&domain).await;
            targets.push((domain, urls));
        }

        let refresher = self.spawn_refresher();
        let results = tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => {
                refresher.abort();
                return self.interrupted(&confirmed).await;
            }
            results = self.scan_all(targets, confirmed.clone()) => results,
        };
        refresher.abort();
        self.reporter.finish(&self.board.snapshot().await);

        let mut findings = Vec::new();
        for (domain, domain_findings) in results {
            info!(domain = %domain, count = domain_findings.len(), "Domain findings");
            findings.extend(domain_findings);
        }
        info!(
            total = findings.len(),
            elapsed = %format_elapsed(started.elapsed()),
            "Scan complete"
        );

        let reports = self.write(&findings).await?;
        Ok(RunOutcome::Completed { findings, reports })
    }

    /// Phase 1: candidate URLs per domain, up to `threads` at a time. Results
    /// come back in input order.
    async fn harvest_all(&self, domains: &[String]) -> Harvested {
        let mut harvested: Vec<(usize, String, Vec<String>)> = stream::iter(domains.iter().cloned().enumerate())
            .map(|(index, domain)| {
                let harvester = self.harvester.clone();
                async move {
                    info!("URL collection: {}", domain);
                    let urls = harvester.harvest(&domain).await;
                    info!("{}: {} endpoint found", domain, urls.len());
                    (index, domain, urls)
                }
            })
            .buffer_unordered(self.config.threads.max(1))
            .collect()
            .await;
        harvested.sort_by_key(|(index, _, _)| *index);
        harvested.into_iter().map(|(_, domain, urls)| (domain, urls)).collect()
    }

    /// Phase 2: every domain through the domain-tier pool. Results come back
    /// in input order.
    async fn scan_all(&self, targets: Harvested, confirmed: Arc<Mutex<Vec<Finding>>>) -> Vec<(String, Vec<Finding>)> {
        let results: Arc<Mutex<Vec<(usize, String, Vec<Finding>)>>> = Arc::new(Mutex::new(Vec::new()));

        let on_hit: HitCallback = {
            let confirmed = confirmed.clone();
            let reporter = self.reporter.clone();
            Arc::new(move |finding: &Finding| {
                confirmed.lock().unwrap_or_else(PoisonError::into_inner).push(finding.clone());
                reporter.hit(finding);
            })
        };

        let limits = DomainLimits {
            max_errors: self.config.max_errors,
            max_findings: self.config.max_hits,
            workers: self.config.url_workers,
        };

        let handler = {
            let board = self.board.clone();
            let scanner = self.scanner.clone();
            let shutdown = self.cancel_token.clone();
            let request_limit = self.request_limit.clone();
            let results = results.clone();
            move |(index, domain, urls): (usize, String, Vec<String>)| {
                let board = board.clone();
                let scanner = scanner.clone();
                let domain_token = shutdown.child_token();
                let request_limit = request_limit.clone();
                let on_hit = on_hit.clone();
                let confirmed = confirmed.clone();
                let results = results.clone();
                async move {
                    board.advance(&domain, ScanStatus::InProgress).await;
                    info!(domain = %domain, urls = urls.len(), "Domain scan started");

                    let task_domain = domain.clone();
                    let handle = tokio::spawn(async move {
                        scan_domain(&task_domain, urls, scanner, limits, domain_token, request_limit, on_hit).await
                    });

                    let findings = match handle.await {
                        Ok(report) => {
                            info!(
                                domain = %domain,
                                findings = report.findings.len(),
                                errors = report.errors,
                                probed = report.probed,
                                total = report.total_urls,
                                stopped_early = report.stopped_early,
                                "Domain scan finished"
                            );
                            report.findings
                        }
                        Err(e) => {
                            error!(domain = %domain, error = %e, "Domain scan task failed");
                            confirmed_for(&confirmed, &domain)
                        }
                    };

                    board.advance(&domain, ScanStatus::Done).await;
                    results.lock().unwrap_or_else(PoisonError::into_inner).push((index, domain, findings));
                }
            }
        };

        let items = targets
            .into_iter()
            .enumerate()
            .map(|(index, (domain, urls))| (index, domain, urls))
            .collect();
        drive(items, self.config.threads, self.cancel_token.clone(), handler).await;

        let mut results = std::mem::take(&mut *results.lock().unwrap_or_else(PoisonError::into_inner));
        results.sort_by_key(|(index, _, _)| *index);
        results.into_iter().map(|(_, domain, findings)| (domain, findings)).collect()
    }

    fn spawn_refresher(&self) -> JoinHandle<()> {
        let board = self.board.clone();
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(STATUS_REFRESH);
            loop {
                ticker.tick().await;
                reporter.render(&board.snapshot().await);
            }
        })
    }

    async fn interrupted(&self, confirmed: &Mutex<Vec<Finding>>) -> Result<RunOutcome, ScanError> {
        self.reporter.println(SHUTDOWN_MESSAGE);
        let findings = std::mem::take(&mut *confirmed.lock().unwrap_or_else(PoisonError::into_inner));
        let count = findings.len();

        match self.config.interrupt {
            InterruptPolicy::Discard => {
                if count > 0 {
                    warn!(discarded = count, "Run interrupted, confirmed findings not written");
                } else {
                    warn!("Run interrupted");
                }
                Ok(RunOutcome::Interrupted { confirmed: count, reports: None })
            }
            InterruptPolicy::FlushPartial => {
                warn!(confirmed = count, "Run interrupted, writing partial report");
                let reports = self.write(&findings).await?;
                Ok(RunOutcome::Interrupted { confirmed: count, reports: Some(reports) })
            }
        }
    }

    async fn write(&self, findings: &[Finding]) -> Result<ReportPaths, ScanError> {
        write_reports(
            findings,
            &self.config.out_file,
            self.config.html.as_ref(),
            &self.config.output_dir,
        ).await
    }
}

/// Findings already confirmed for `domain` through the hit callback.
fn confirmed_for(confirmed: &Mutex<Vec<Finding>>, domain: &str) -> Vec<Finding> {
    confirmed
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .filter(|f| f.domain == domain)
        .cloned()
        .collect()
}

/// Drop repeated domains, keeping first occurrences in order.
fn dedupe(domains: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    domains.into_iter().filter(|d| seen.insert(d.clone())).collect()
}
