//! Standalone HTML report: one table per domain, dark theme, small inline
//! script for copy / hide / mark-seen actions.

use std::path::Path;
use html_escape::{encode_double_quoted_attribute, encode_safe};
use crate::errors::ScanError;
use crate::models::Finding;
use super::ensure_parent;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>XSS Report</title>
    <style>
        body { background-color: #1e1e2f; color: #f0f0f0; font-family: 'Segoe UI', sans-serif; }
        .container { max-width: 1000px; margin: auto; padding: 2rem; }
        h1 { color: #00d4ff; }
        h2 { margin-top: 2rem; color: #5fdde5; }
        table { width: 100%; border-collapse: collapse; margin-bottom: 3rem; }
        th, td { padding: 0.5rem; border: 1px solid #444; vertical-align: top; white-space: nowrap; }
        td:first-child { white-space: normal; word-break: break-all; }
        th { background-color: #292940; color: #fff; }
        tr:nth-child(even) { background-color: #2a2a3d; }
        tr.seen td { opacity: 0.5; }
        .actions button, .actions a { display: inline-block; margin-right: 4px; background: none; border: none; color: #00d4ff; font-size: 1rem; cursor: pointer; }
        .actions button:hover { color: #00ffff; }
        .payload { color: #d14c4c; font-weight: bold; font-family: monospace; }
    </style>
    <script>
        function copyToClipboard(text) { navigator.clipboard.writeText(text); }
        function hideRow(button) { button.closest('tr').style.display = 'none'; }
        function toggleSeen(button) { button.closest('tr').classList.toggle('seen'); }
    </script>
</head>
<body>
    <div class="container">
        <h1>XSS Findings</h1>
"#;

const FOOT: &str = "    </div>\n</body>\n</html>\n";

/// Findings grouped by domain, domains in first-seen order.
fn group_by_domain(findings: &[Finding]) -> Vec<(&str, Vec<&Finding>)> {
    let mut groups: Vec<(&str, Vec<&Finding>)> = Vec::new();
    for finding in findings {
        match groups.iter_mut().find(|(domain, _)| *domain == finding.domain) {
            Some((_, group)) => group.push(finding),
            None => groups.push((finding.domain.as_str(), vec![finding])),
        }
    }
    groups
}

/// A JS string literal safe to place inside a double-quoted attribute.
fn js_arg(value: &str) -> String {
    let literal = serde_json::Value::String(value.to_string()).to_string();
    encode_double_quoted_attribute(&literal).into_owned()
}

fn render_row(out: &mut String, finding: &Finding) {
    let url = encode_safe(&finding.vulnerable_url);
    let href = encode_double_quoted_attribute(&finding.vulnerable_url);
    let payload = encode_safe(&finding.payload);

    out.push_str("                <tr>");
    out.push_str(&format!("<td>{}</td>", url));
    out.push_str(&format!("<td class=\"payload\">{}</td>", payload));
    out.push_str("<td class=\"actions\">");
    out.push_str(&format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"Open\">🌐</a>",
        href
    ));
    out.push_str(&format!(
        "<button onclick=\"copyToClipboard({})\" title=\"Copy URL\">📋</button>",
        js_arg(&finding.vulnerable_url)
    ));
    out.push_str(&format!(
        "<button onclick=\"copyToClipboard({})\" title=\"Copy Payload\">📋</button>",
        js_arg(&finding.payload)
    ));
    out.push_str("<button onclick=\"hideRow(this)\" title=\"Hide Row\">🗑️</button>");
    out.push_str("<button onclick=\"toggleSeen(this)\" title=\"Mark as seen\">☑️</button>");
    out.push_str("</td></tr>\n");
}

pub fn render_html(findings: &[Finding]) -> String {
    let mut out = String::from(HEAD);
    for (domain, group) in group_by_domain(findings) {
        out.push_str(&format!("        <h2>{}</h2>\n", encode_safe(domain)));
        out.push_str("        <table>\n");
        out.push_str("            <thead><tr><th>URL</th><th>Payload</th><th>Actions</th></tr></thead>\n");
        out.push_str("            <tbody>\n");
        for finding in group {
            render_row(&mut out, finding);
        }
        out.push_str("            </tbody>\n");
        out.push_str("        </table>\n");
    }
    out.push_str(FOOT);
    out
}

pub async fn write_html(findings: &[Finding], path: &Path) -> Result<(), ScanError> {
    ensure_parent(path).await?;
    tokio::fs::write(path, render_html(findings))
        .await
        .map_err(|e| ScanError::Report(format!("failed to write {}: {}", path.display(), e)))
}
