use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use crate::models::{Finding, ScanStatus};
use crate::pipeline::state::DomainEntry;
use super::{counts_line, hit_line, StatusReporter};

/// Line-oriented reporter for pipes and CI logs. Prints a line only when a
/// domain changes status.
#[derive(Default)]
pub struct PlainReporter {
    seen: Mutex<HashMap<String, ScanStatus>>,
}

impl PlainReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries whose status differs from the last render.
    fn transitions(&self, entries: &[DomainEntry]) -> Vec<String> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .filter(|e| seen.insert(e.domain.clone(), e.status) != Some(e.status))
            .map(|e| format!("{} {}", e.domain, e.status))
            .collect()
    }
}

impl StatusReporter for PlainReporter {
    fn render(&self, entries: &[DomainEntry]) {
        for line in self.transitions(entries) {
            println!("{}", line);
        }
    }

    fn hit(&self, finding: &Finding) {
        println!("{}", hit_line(finding));
    }

    fn println(&self, line: &str) {
        println!("{}", line);
    }

    fn finish(&self, entries: &[DomainEntry]) {
        self.render(entries);
        println!("{}", counts_line(entries));
    }
}
