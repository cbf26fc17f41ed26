pub mod domain;
pub mod orchestrator;
pub mod pool;
pub mod state;

pub use domain::{scan_domain, DomainLimits, DomainScanReport, HitCallback};
pub use orchestrator::{RunOrchestrator, RunOutcome, STATUS_REFRESH};
pub use pool::{drive, PoolReport, WorkQueue};
pub use state::{DomainEntry, StatusBoard, StatusCounts};
