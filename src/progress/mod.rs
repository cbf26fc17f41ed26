pub mod plain;
pub mod table;
pub mod writer;

use std::sync::Arc;
use crate::models::Finding;
use crate::pipeline::state::{summarize, DomainEntry};

pub use plain::PlainReporter;
pub use table::TableReporter;
pub use writer::LogWriter;

/// Live view of a run. Called from the status refresher and from probe
/// completion, so implementations must be cheap and never block on I/O for long.
pub trait StatusReporter: Send + Sync {
    /// Redraw from a fresh status board snapshot.
    fn render(&self, entries: &[DomainEntry]);

    /// A finding was just confirmed.
    fn hit(&self, finding: &Finding);

    /// Print a line without tearing the live view.
    fn println(&self, line: &str);

    /// Final redraw once the scan phase has ended.
    fn finish(&self, entries: &[DomainEntry]);
}

/// The live table on a terminal, plain transition lines otherwise.
pub fn select_reporter(interactive: bool) -> Arc<dyn StatusReporter> {
    if interactive {
        Arc::new(TableReporter::new())
    } else {
        Arc::new(PlainReporter::new())
    }
}

pub(crate) fn hit_line(finding: &Finding) -> String {
    format!("[!!!] {} VULN: {}", finding.domain, finding.vulnerable_url)
}

pub(crate) fn counts_line(entries: &[DomainEntry]) -> String {
    let counts = summarize(entries);
    format!(
        "XSS Testing Status | {} waiting | {} in progress | {} done",
        counts.waiting, counts.in_progress, counts.done,
    )
}
