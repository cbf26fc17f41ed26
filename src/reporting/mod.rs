pub mod html;
pub mod json;

use std::path::{Path, PathBuf};
use crate::config::settings::DEFAULT_OUT_FILE;
use crate::errors::ScanError;
use crate::models::Finding;
use tracing::{debug, info};

/// Where the HTML report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlTarget {
    /// `<output_dir>/<YYYYMMDD>_report.html`, suffixed when taken.
    Auto,
    Path(PathBuf),
}

impl HtmlTarget {
    /// `auto` (any case) selects automatic naming; anything else is a path.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

/// Files written by one `write_reports` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: Option<PathBuf>,
}

/// Write the JSON report and, when requested and there is something to show,
/// the HTML report.
pub async fn write_reports(
    findings: &[Finding],
    out_file: &Path,
    html: Option<&HtmlTarget>,
    output_dir: &Path,
) -> Result<ReportPaths, ScanError> {
    let stamp = chrono::Local::now().format("%Y%m%d").to_string();

    let json_path = if is_default_name(out_file) {
        tokio::fs::create_dir_all(output_dir).await?;
        next_available(output_dir, &stamp, "json")
    } else {
        out_file.to_path_buf()
    };
    json::write_json(findings, &json_path).await?;
    info!(path = %json_path.display(), count = findings.len(), "Report saved");

    let html_path = match html {
        Some(_) if findings.is_empty() => {
            debug!("No findings, skipping HTML report");
            None
        }
        Some(HtmlTarget::Auto) => {
            tokio::fs::create_dir_all(output_dir).await?;
            Some(next_available(output_dir, &stamp, "html"))
        }
        Some(HtmlTarget::Path(path)) => Some(path.clone()),
        None => None,
    };
    if let Some(path) = &html_path {
        html::write_html(findings, path).await?;
        info!(path = %path.display(), "HTML report saved");
    }

    Ok(ReportPaths { json: json_path, html: html_path })
}

fn is_default_name(out_file: &Path) -> bool {
    out_file.file_name().is_some_and(|name| name == DEFAULT_OUT_FILE)
}

/// First free name among `<stamp>_report.<ext>`, `<stamp>_report_1.<ext>`, ...
pub fn next_available(dir: &Path, stamp: &str, ext: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{}_report.{}", stamp, ext));
    let mut counter = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}_report_{}.{}", stamp, counter, ext));
        counter += 1;
    }
    candidate
}

/// Create the parent directory of `path` if it has one.
pub(crate) async fn ensure_parent(path: &Path) -> Result<(), ScanError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent).await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_target_parse() {
        assert_eq!(HtmlTarget::parse("auto"), HtmlTarget::Auto);
        assert_eq!(HtmlTarget::parse("AUTO"), HtmlTarget::Auto);
        assert_eq!(
            HtmlTarget::parse("out/x.html"),
            HtmlTarget::Path(PathBuf::from("out/x.html"))
        );
    }

    #[test]
    fn test_default_name_matches_file_name_only() {
        assert!(is_default_name(Path::new("hu_report.json")));
        assert!(is_default_name(Path::new("some/dir/hu_report.json")));
        assert!(!is_default_name(Path::new("custom.json")));
    }

    #[test]
    fn test_next_available_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let first = next_available(dir.path(), "20260101", "json");
        assert_eq!(first, dir.path().join("20260101_report.json"));
        std::fs::write(&first, "[]").unwrap();

        let second = next_available(dir.path(), "20260101", "json");
        assert_eq!(second, dir.path().join("20260101_report_1.json"));
        std::fs::write(&second, "[]").unwrap();

        assert_eq!(
            next_available(dir.path(), "20260101", "json"),
            dir.path().join("20260101_report_2.json")
        );
    }
}
