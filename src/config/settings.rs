use std::path::PathBuf;
use std::time::Duration;
use crate::errors::ScanError;
use crate::reporting::HtmlTarget;
use super::types::InterruptPolicy;
use tracing::debug;

pub const DEFAULT_THREADS: usize = 10;
pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_TLD: &str = "hu";
pub const DEFAULT_MAX_ERRORS: usize = 5;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 50;
pub const DEFAULT_OUT_FILE: &str = "hu_report.json";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_PAYLOAD_PATH: &str = "payloads/XSS/reflected.txt";
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(6);

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub run_id: String,
    /// Domain-tier pool width.
    pub threads: usize,
    /// URL-tier pool width inside each domain.
    pub url_workers: usize,
    /// Run-wide cap on concurrent probes across all domains.
    pub max_in_flight: usize,
    pub max_errors: usize,
    pub max_hits: Option<usize>,
    pub verify_tls: bool,
    pub interrupt: InterruptPolicy,
    pub live_only: bool,
    pub target: Option<String>,
    pub tld: String,
    pub limit: usize,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
    pub tool_timeout: Duration,
    pub probe_timeout: Duration,
    pub payloads_path: PathBuf,
    pub out_file: PathBuf,
    pub output_dir: PathBuf,
    pub html: Option<HtmlTarget>,
}

impl RunConfig {
    /// Create the output and cache directories. Called once before the run starts.
    pub async fn prepare_dirs(&self) -> Result<(), ScanError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        debug!(
            output_dir = %self.output_dir.display(),
            cache_dir = %self.cache_dir.display(),
            "Run directories ready"
        );
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            threads: DEFAULT_THREADS,
            url_workers: DEFAULT_THREADS,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            max_errors: DEFAULT_MAX_ERRORS,
            max_hits: None,
            verify_tls: true,
            interrupt: InterruptPolicy::Discard,
            live_only: false,
            target: None,
            tld: DEFAULT_TLD.to_string(),
            limit: DEFAULT_LIMIT,
            use_cache: false,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            probe_timeout: PROBE_TIMEOUT,
            payloads_path: PathBuf::from(DEFAULT_PAYLOAD_PATH),
            out_file: PathBuf::from(DEFAULT_OUT_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            html: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.threads, 10);
        assert_eq!(config.url_workers, 10);
        assert_eq!(config.max_errors, 5);
        assert!(config.max_hits.is_none());
        assert!(config.verify_tls);
        assert_eq!(config.out_file, PathBuf::from("hu_report.json"));
        assert_eq!(config.probe_timeout, Duration::from_secs(6));
        assert!(config.html.is_none());
    }

    #[tokio::test]
    async fn test_prepare_dirs_creates_both() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            output_dir: dir.path().join("out"),
            cache_dir: dir.path().join("cache"),
            ..Default::default()
        };
        config.prepare_dirs().await.unwrap();
        assert!(dir.path().join("out").is_dir());
        assert!(dir.path().join("cache").is_dir());
    }
}
