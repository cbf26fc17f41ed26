use std::path::Path;
use crate::errors::ScanError;
use crate::models::Finding;
use super::ensure_parent;

pub fn render_json(findings: &[Finding]) -> Result<String, ScanError> {
    serde_json::to_string_pretty(findings)
        .map_err(|e| ScanError::Report(format!("failed to serialize findings: {}", e)))
}

pub async fn write_json(findings: &[Finding], path: &Path) -> Result<(), ScanError> {
    let body = render_json(findings)?;
    ensure_parent(path).await?;
    tokio::fs::write(path, body)
        .await
        .map_err(|e| ScanError::Report(format!("failed to write {}: {}", path.display(), e)))
}
