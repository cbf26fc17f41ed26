use std::sync::Arc;
use tokio::sync::RwLock;
use crate::models::ScanStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain: String,
    pub status: ScanStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub waiting: usize,
    pub in_progress: usize,
    pub done: usize,
}

/// Run-wide scan status per domain, in registration order.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    entries: Arc<RwLock<Vec<DomainEntry>>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `domain` as WAITING. Registering twice is a no-op.
    pub async fn register(&self, domain: &str) {
        let mut entries = self.entries.write().await;
        if !entries.iter().any(|e| e.domain == domain) {
            entries.push(DomainEntry {
                domain: domain.to_string(),
                status: ScanStatus::Waiting,
            });
        }
    }

    /// Move `domain` forward to `status`. Returns false for unknown domains
    /// and for transitions that would go backwards.
    pub async fn advance(&self, domain: &str, status: ScanStatus) -> bool {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.domain == domain) {
            Some(entry) if status > entry.status => {
                entry.status = status;
                true
            }
            _ => false,
        }
    }

    pub async fn status(&self, domain: &str) -> Option<ScanStatus> {
        self.entries.read().await
            .iter()
            .find(|e| e.domain == domain)
            .map(|e| e.status)
    }

    pub async fn snapshot(&self) -> Vec<DomainEntry> {
        self.entries.read().await.clone()
    }

}

pub fn summarize(entries: &[DomainEntry]) -> StatusCounts {
    entries.iter().fold(StatusCounts::default(), |mut c, e| {
        match e.status {
            ScanStatus::Waiting => c.waiting += 1,
            ScanStatus::InProgress => c.in_progress += 1,
            ScanStatus::Done => c.done += 1,
        }
        c
    })
}
