use std::path::{Path, PathBuf};
use crate::errors::ScanError;
use tracing::{info, warn};

/// On-disk crt.sh results, one JSON array per TLD.
#[derive(Debug, Clone)]
pub struct DomainCache {
    dir: PathBuf,
}

impl DomainCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, tld: &str) -> PathBuf {
        let safe: String = tld
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("crtsh_{}.json", safe))
    }

    /// Cached domains for `tld`, truncated to `limit`. `None` when there is no
    /// usable cache entry; a corrupt entry is logged and ignored.
    pub async fn load(&self, tld: &str, limit: usize) -> Option<Vec<String>> {
        let path = self.path_for(tld);
        if !path.exists() {
            return None;
        }
        info!(path = %path.display(), "Loading cache file");
        match read_entry(&path).await {
            Ok(mut domains) => {
                domains.truncate(limit);
                Some(domains)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed reading cache");
                None
            }
        }
    }

    /// Persist domains for `tld`. Failures are logged, never returned.
    pub async fn store(&self, tld: &str, domains: &[String]) {
        let path = self.path_for(tld);
        match write_entry(&path, domains).await {
            Ok(()) => info!(path = %path.display(), "Cache saved"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to save cache"),
        }
    }
}

async fn read_entry(path: &Path) -> Result<Vec<String>, ScanError> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .map_err(|e| ScanError::Cache(format!("{}: {}", path.display(), e)))
}

async fn write_entry(path: &Path, domains: &[String]) -> Result<(), ScanError> {
    let json = serde_json::to_string_pretty(domains)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
