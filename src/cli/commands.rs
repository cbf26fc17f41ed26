use std::path::PathBuf;
use clap::Parser;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIMESTAMP"), ")");

const AFTER_HELP: &str = "\
Pipeline:
  1. Query candidate domains from crt.sh certificate logs (%.<tld>)
  2. Optionally keep only live domains (200/301/302)
  3. Gather URLs per domain with gau, waybackurls and hakrawler
  4. Inject XSS payloads into every query parameter and check for reflection
  5. Save the findings as JSON (and optionally HTML)

Required tools (Go needed):
  go install github.com/lc/gau/v2/cmd/gau@latest
  go install github.com/tomnomnom/waybackurls@latest
  go install github.com/hakluke/hakrawler@latest

Examples:
  lhfcrawler --target example.hu --payloads payloads/XSS/reflected.txt --no-check-cert
  lhfcrawler --tld hu --limit 10 --max-errors 6 --html-report";

/// Numeric and path options carry no clap default so a `--config` file can
/// fill them; built-in defaults apply last.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "lhfcrawler",
    version,
    long_version = LONG_VERSION,
    about = "Domain recon + reflected XSS pipeline",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Concurrent domains (default: 10)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Maximum number of domains to discover (default: 50)
    #[arg(long)]
    pub limit: Option<usize>,

    /// JSON report file name (default: hu_report.json, auto-named under the output directory)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Domain TLD to discover (e.g. hu, com, dev, all)
    #[arg(long)]
    pub tld: Option<String>,

    /// Check that gau, waybackurls and hakrawler are on PATH, then exit
    #[arg(long)]
    pub tools_check: bool,

    /// Do not verify TLS certificates
    #[arg(long)]
    pub no_check_cert: bool,

    /// Reuse the cached crt.sh response when available
    #[arg(long)]
    pub use_cache: bool,

    /// Scan one domain and skip discovery (e.g. example.hu)
    #[arg(long)]
    pub target: Option<String>,

    /// XSS payload file, one payload per line
    #[arg(long)]
    pub payloads: Option<PathBuf>,

    /// Failed probes per domain before skipping it (default: 5)
    #[arg(long)]
    pub max_errors: Option<usize>,

    /// Maximum findings per domain (default: unlimited)
    #[arg(long)]
    pub max_hits: Option<usize>,

    /// Write an HTML report (only if anything was found). Bare flag: auto-named
    #[arg(long, num_args = 0..=1, default_missing_value = "auto", value_name = "PATH")]
    pub html_report: Option<String>,

    /// Concurrent probes inside one domain (default: --threads)
    #[arg(long)]
    pub url_workers: Option<usize>,

    /// Run-wide cap on concurrent probes (default: 50)
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// On Ctrl+C, write the findings confirmed so far instead of discarding them
    #[arg(long)]
    pub flush_on_interrupt: bool,

    /// Drop domains that do not answer over http(s) before harvesting
    #[arg(long)]
    pub live_only: bool,

    /// Directory for auto-named reports (default: output)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory for the crt.sh cache (default: cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Timeout per harvesting tool, in seconds (default: 600)
    #[arg(long, value_name = "SECS")]
    pub tool_timeout: Option<u64>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_html_report_means_auto() {
        let cli = Cli::parse_from(["lhfcrawler", "--html-report", "--target", "a.hu"]);
        assert_eq!(cli.html_report.as_deref(), Some("auto"));
        assert_eq!(cli.target.as_deref(), Some("a.hu"));
    }

    #[test]
    fn test_html_report_with_path() {
        let cli = Cli::parse_from(["lhfcrawler", "--html-report", "r.html"]);
        assert_eq!(cli.html_report.as_deref(), Some("r.html"));
    }

    #[test]
    fn test_unset_options_stay_unset() {
        let cli = Cli::parse_from(["lhfcrawler", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.threads.is_none());
        assert!(cli.html_report.is_none());
        assert!(!cli.no_check_cert);
    }
}
