use clap::Parser;
use lhfcrawler::cli::{self, Cli};
use lhfcrawler::errors::ScanError;
use lhfcrawler::progress::LogWriter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging. Records go to stderr around the live table.
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(LogWriter::stderr());
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.with_ansi(!cli.no_color).init();
    }

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    if cli.tools_check {
        let all_ok = cli::tools::handle_tools_check();
        std::process::exit(if all_ok { 0 } else { 1 });
    }

    if let Err(e) = cli::scan::handle_scan(cli).await {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            ScanError::Config(_) | ScanError::Yaml(_) => 2,
            ScanError::InvalidTarget(_) => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
