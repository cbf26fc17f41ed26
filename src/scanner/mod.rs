pub mod query;
pub mod xss;

use async_trait::async_trait;
use crate::errors::ScanError;
use crate::models::Reflection;

pub use xss::XssProbe;

/// Tests a single candidate URL.
///
/// `Ok(None)` means the URL was tested and nothing reflected. `Err` means the
/// URL could not be tested and counts against the domain's error budget.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn probe(&self, url: &str) -> Result<Option<Reflection>, ScanError>;

    /// Scanner name for logging
    fn scanner_name(&self) -> &str;
}
