use std::path::PathBuf;
use std::sync::Arc;
use console::Term;
use tokio_util::sync::CancellationToken;
use crate::cli::commands::Cli;
use crate::config::settings::*;
use crate::config::{self, FileConfig, InterruptPolicy, RunConfig};
use crate::discovery::{filter_live, is_hostname, liveness_client, CrtShSource, DomainCache, DomainSource};
use crate::errors::ScanError;
use crate::harvest::UrlHarvester;
use crate::payloads::load_payloads;
use crate::pipeline::{RunOrchestrator, RunOutcome};
use crate::progress::select_reporter;
use crate::reporting::HtmlTarget;
use crate::scanner::XssProbe;
use tracing::{info, warn};

pub async fn handle_scan(cli: Cli) -> Result<(), ScanError> {
    let file_config = if let Some(path) = &cli.config {
        Some(config::parse_config(path).await?)
    } else {
        None
    };
    let config = build_run_config(&cli, file_config.as_ref())?;

    info!(
        run_id = %config.run_id,
        version = env!("CARGO_PKG_VERSION"),
        git = option_env!("GIT_HASH").unwrap_or("unknown"),
        threads = config.threads,
        url_workers = config.url_workers,
        interrupt = %config.interrupt,
        "LHF Crawler starting"
    );
    if !config.verify_tls {
        warn!("TLS certificate verification disabled");
    }
    config.prepare_dirs().await?;

    let payloads = load_payloads(&config.payloads_path).await;

    let mut domains = match &config.target {
        Some(target) => vec![target.clone()],
        None => {
            let source = CrtShSource::new(DomainCache::new(&config.cache_dir))?;
            source.discover(&config.tld, config.limit, config.use_cache).await
        }
    };
    if config.live_only {
        let client = liveness_client(config.verify_tls)?;
        domains = filter_live(&client, domains, config.threads).await;
    }
    if domains.is_empty() {
        warn!("No domains to scan");
    }

    let scanner = Arc::new(XssProbe::new(payloads, config.verify_tls, config.probe_timeout)?);
    let harvester = Arc::new(UrlHarvester::with_default_tools(config.tool_timeout));
    let reporter = select_reporter(Term::stdout().is_term());

    let shutdown = CancellationToken::new();
    let ctrl_c = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        })
    };

    let orchestrator = RunOrchestrator::new(config, scanner, harvester)
        .with_reporter(reporter)
        .with_cancel_token(shutdown);
    let outcome = orchestrator.run(domains).await;
    ctrl_c.abort();

    match outcome? {
        RunOutcome::Completed { findings, reports } => {
            info!(
                findings = findings.len(),
                json = %reports.json.display(),
                html = %reports.html.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "-".into()),
                "Run completed"
            );
        }
        RunOutcome::Interrupted { confirmed, reports } => {
            match reports {
                Some(reports) => info!(confirmed, json = %reports.json.display(), "Partial report written"),
                None => info!(confirmed, "Run interrupted, no report written"),
            }
        }
    }
    Ok(())
}

/// Merge CLI flags over the config file over built-in defaults.
pub fn build_run_config(cli: &Cli, file: Option<&FileConfig>) -> Result<RunConfig, ScanError> {
    let scan = file.and_then(|f| f.scan.clone()).unwrap_or_default();
    let discovery = file.and_then(|f| f.discovery.clone()).unwrap_or_default();
    let harvest = file.and_then(|f| f.harvest.clone()).unwrap_or_default();
    let payloads = file.and_then(|f| f.payloads.clone()).unwrap_or_default();
    let output = file.and_then(|f| f.output.clone()).unwrap_or_default();

    let threads = cli.threads.or(scan.threads).unwrap_or(DEFAULT_THREADS);
    let url_workers = cli.url_workers.or(scan.url_workers).unwrap_or(threads);
    let max_in_flight = cli.max_in_flight.or(scan.max_in_flight).unwrap_or(DEFAULT_MAX_IN_FLIGHT);
    let max_hits = cli.max_hits.or(scan.max_hits);
    let limit = cli.limit.or(discovery.limit).unwrap_or(DEFAULT_LIMIT);
    let tool_timeout = cli.tool_timeout.or(harvest.tool_timeout_secs).unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS);

    for (name, value) in [
        ("threads", threads),
        ("url-workers", url_workers),
        ("max-in-flight", max_in_flight),
        ("limit", limit),
    ] {
        if value == 0 {
            return Err(ScanError::Config(format!("--{} must be at least 1", name)));
        }
    }
    if max_hits == Some(0) {
        return Err(ScanError::Config("--max-hits must be at least 1".into()));
    }
    if tool_timeout == 0 {
        return Err(ScanError::Config("--tool-timeout must be at least 1 second".into()));
    }

    let tld = cli.tld.clone()
        .or(discovery.tld)
        .unwrap_or_else(|| DEFAULT_TLD.to_string())
        .trim()
        .trim_start_matches('.')
        .to_lowercase();
    if tld.is_empty() {
        return Err(ScanError::Config("--tld must not be empty".into()));
    }

    let target = cli.target.as_deref().map(normalize_target).transpose()?;

    let interrupt = if cli.flush_on_interrupt {
        InterruptPolicy::FlushPartial
    } else {
        scan.interrupt.unwrap_or_default()
    };

    let html = cli.html_report.as_deref()
        .or(output.html.as_deref())
        .map(HtmlTarget::parse);

    Ok(RunConfig {
        threads,
        url_workers,
        max_in_flight,
        max_errors: cli.max_errors.or(scan.max_errors).unwrap_or(DEFAULT_MAX_ERRORS),
        max_hits,
        verify_tls: !cli.no_check_cert && scan.verify_tls.unwrap_or(true),
        interrupt,
        live_only: cli.live_only || scan.live_only.unwrap_or(false),
        target,
        tld,
        limit,
        use_cache: cli.use_cache || discovery.use_cache.unwrap_or(false),
        cache_dir: cli.cache_dir.clone()
            .or(discovery.cache_dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
        tool_timeout: std::time::Duration::from_secs(tool_timeout),
        payloads_path: cli.payloads.clone()
            .or(payloads.path.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PAYLOAD_PATH)),
        out_file: cli.out.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_FILE)),
        output_dir: cli.output_dir.clone()
            .or(output.directory.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        html,
        ..RunConfig::default()
    })
}

/// Accept `example.hu`, `https://example.hu/` and similar; return the bare hostname.
fn normalize_target(raw: &str) -> Result<String, ScanError> {
    let trimmed = raw.trim();
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    if is_hostname(host) {
        Ok(host.to_string())
    } else {
        Err(ScanError::InvalidTarget(format!("not a valid domain: {}", raw)))
    }
}
