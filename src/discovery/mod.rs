pub mod cache;
pub mod crtsh;
pub mod liveness;

use async_trait::async_trait;

pub use cache::DomainCache;
pub use crtsh::{is_hostname, CrtShSource};
pub use liveness::{filter_live, is_live, liveness_client};

/// Produces candidate domains for a TLD.
#[async_trait]
pub trait DomainSource: Send + Sync {
    /// Ordered, deduplicated domains, at most `limit`. Empty on upstream failure.
    async fn discover(&self, tld: &str, limit: usize, use_cache: bool) -> Vec<String>;
}
