use std::path::Path;
use crate::errors::ScanError;
use tracing::{info, warn};

/// Used when the payload file cannot be loaded.
pub const FALLBACK_PAYLOADS: [&str; 2] = [
    "<script>alert(1)</script>",
    "'\"><img src=x onerror=alert(1)>",
];

/// Load payloads from a UTF-8 file, one per line, skipping blank lines.
/// Never fails: any problem is logged and the fallback pair is returned.
pub async fn load_payloads(path: &Path) -> Vec<String> {
    match read_payload_file(path).await {
        Ok(payloads) => {
            info!(count = payloads.len(), path = %path.display(), "XSS payloads loaded");
            payloads
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to load payloads, using defaults");
            FALLBACK_PAYLOADS.iter().map(|p| p.to_string()).collect()
        }
    }
}

async fn read_payload_file(path: &Path) -> Result<Vec<String>, ScanError> {
    if !path.exists() {
        return Err(ScanError::Config(format!("Payload file not found: {}", path.display())));
    }
    let content = tokio::fs::read_to_string(path).await?;
    let payloads = parse_payloads(&content);
    if payloads.is_empty() {
        return Err(ScanError::Config(format!("Payload file has no payloads: {}", path.display())));
    }
    Ok(payloads)
}

fn parse_payloads(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payloads_trims_and_skips_blank() {
        let parsed = parse_payloads("  <b>1</b>  \n\n\t\n\"><svg onload=1>\r\n");
        assert_eq!(parsed, vec!["<b>1</b>", "\"><svg onload=1>"]);
    }

    #[tokio::test]
    async fn test_load_payloads_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xss.txt");
        tokio::fs::write(&path, "third\nfirst\nsecond\n").await.unwrap();
        assert_eq!(load_payloads(&path).await, vec!["third", "first", "second"]);
    }

    #[tokio::test]
    async fn test_load_payloads_missing_file_falls_back() {
        let payloads = load_payloads(Path::new("/nonexistent/payloads.txt")).await;
        assert_eq!(payloads, FALLBACK_PAYLOADS.to_vec());
    }

    #[tokio::test]
    async fn test_load_payloads_empty_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        tokio::fs::write(&path, "\n  \n").await.unwrap();
        assert_eq!(load_payloads(&path).await.len(), 2);
    }

    #[tokio::test]
    async fn test_load_payloads_invalid_utf8_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        tokio::fs::write(&path, [0xff, 0xfe, 0x00]).await.unwrap();
        assert_eq!(load_payloads(&path).await, FALLBACK_PAYLOADS.to_vec());
    }
}
