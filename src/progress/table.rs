use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use crate::models::{Finding, ScanStatus};
use crate::pipeline::state::DomainEntry;
use super::{counts_line, hit_line, StatusReporter};
use super::writer::live_view;
use tracing::debug;

/// indicatif table: a header with status counts and one row per domain.
pub struct TableReporter {
    multi: MultiProgress,
    header: ProgressBar,
    rows: Mutex<HashMap<String, ProgressBar>>,
}

impl TableReporter {
    /// Draws into the shared live view that [`super::LogWriter`] suspends.
    pub fn new() -> Self {
        Self::with_multi(live_view())
    }

    pub fn with_target(target: ProgressDrawTarget) -> Self {
        Self::with_multi(MultiProgress::with_draw_target(target))
    }

    fn with_multi(multi: MultiProgress) -> Self {
        let header = multi.add(ProgressBar::new_spinner());
        header.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        );
        header.set_message("XSS Testing Status");
        header.enable_steady_tick(std::time::Duration::from_millis(120));

        Self {
            multi,
            header,
            rows: Mutex::new(HashMap::new()),
        }
    }

    fn row_message(entry: &DomainEntry) -> String {
        let label = match entry.status {
            ScanStatus::Waiting => style(entry.status.label()).dim(),
            ScanStatus::InProgress => style(entry.status.label()).yellow(),
            ScanStatus::Done => style(entry.status.label()).green(),
        };
        format!("{:<48} {}", entry.domain, label)
    }

    fn draw(&self, entries: &[DomainEntry]) {
        self.header.set_message(counts_line(entries));

        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        for entry in entries {
            let row = rows.entry(entry.domain.clone()).or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner())
                );
                bar
            });
            row.set_message(Self::row_message(entry));
        }
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for TableReporter {
    fn render(&self, entries: &[DomainEntry]) {
        self.draw(entries);
    }

    fn hit(&self, finding: &Finding) {
        self.println(&format!("  {}", style(hit_line(finding)).red().bold()));
    }

    fn println(&self, line: &str) {
        if let Err(e) = self.multi.println(line) {
            debug!(error = %e, "Live view write failed");
        }
    }

    fn finish(&self, entries: &[DomainEntry]) {
        self.draw(entries);
        for row in self.rows.lock().unwrap_or_else(PoisonError::into_inner).values() {
            row.finish();
        }
        self.header.finish_with_message(counts_line(entries));
    }
}
