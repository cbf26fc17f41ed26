use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use async_trait::async_trait;
use tokio::process::Command;
use crate::errors::ScanError;
use super::UrlSource;
use tracing::debug;

const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// An external URL-discovery binary. Each stdout line is a candidate URL.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalTool {
    /// `args` may contain `{domain}`, replaced per invocation.
    pub fn new(program: &str, args: &[&str], timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout,
        }
    }

    pub fn gau(timeout: Duration) -> Self {
        Self::new("gau", &[DOMAIN_PLACEHOLDER], timeout)
    }

    pub fn waybackurls(timeout: Duration) -> Self {
        Self::new("waybackurls", &[DOMAIN_PLACEHOLDER], timeout)
    }

    pub fn hakrawler(timeout: Duration) -> Self {
        Self::new("hakrawler", &["-url", "https://{domain}", "-depth", "2"], timeout)
    }

    fn resolve_args(&self, domain: &str) -> Vec<String> {
        self.args.iter().map(|a| a.replace(DOMAIN_PLACEHOLDER, domain)).collect()
    }
}

#[async_trait]
impl UrlSource for ExternalTool {
    async fn discover(&self, domain: &str) -> Result<HashSet<String>, ScanError> {
        let args = self.resolve_args(domain);
        debug!(tool = %self.program, ?args, "Running URL discovery tool");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScanError::Tool(format!("{}: {}", self.program, e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScanError::Timeout(format!(
                "{} timed out after {}s for {}",
                self.program,
                self.timeout.as_secs(),
                domain
            )))?
            .map_err(|e| ScanError::Tool(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            debug!(tool = %self.program, status = %output.status, "Tool exited unsuccessfully, keeping its output");
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn source_name(&self) -> &str {
        &self.program
    }
}

/// Location of an executable `program` on `PATH`, if any.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    find_in(program, &std::env::var_os("PATH")?)
}

/// Like [`find_in_path`], searching `paths` (a `PATH`-style list) instead.
pub fn find_in(program: &str, paths: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    which::which_in(program, Some(paths), cwd).ok()
}
