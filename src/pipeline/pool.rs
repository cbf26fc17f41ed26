use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Fixed arena of work items handed out by an atomic cursor.
pub struct WorkQueue<T> {
    items: Vec<T>,
    cursor: AtomicUsize,
}

impl<T: Clone> WorkQueue<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: AtomicUsize::new(0) }
    }

    pub fn next(&self) -> Option<T> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.items.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items handed out so far.
    pub fn dispatched(&self) -> usize {
        self.cursor.load(Ordering::SeqCst).min(self.items.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    pub total: usize,
    pub dispatched: usize,
}

/// Drain `items` with `width` workers. Each worker checks `cancel` before
/// taking its next item; handlers already running are never interrupted.
/// Resolves once every worker has stopped.
pub async fn drive<T, F, Fut>(
    items: Vec<T>,
    width: usize,
    cancel: CancellationToken,
    handler: F,
) -> PoolReport
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let queue = Arc::new(WorkQueue::new(items));
    let handler = Arc::new(handler);
    let mut workers = JoinSet::new();

    for _ in 0..width.max(1).min(queue.len()) {
        let queue = queue.clone();
        let handler = handler.clone();
        let cancel = cancel.clone();
        workers.spawn(async move {
            while !cancel.is_cancelled() {
                let Some(item) = queue.next() else { break };
                handler(item).await;
            }
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Pool worker ended abnormally");
        }
    }

    PoolReport { total: queue.len(), dispatched: queue.dispatched() }
}
