pub mod tools;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use futures::future::join_all;
use crate::errors::ScanError;
use tracing::warn;

pub use tools::{ExternalTool, find_in_path};

/// Binaries the default harvester shells out to.
pub const REQUIRED_TOOLS: [&str; 3] = ["gau", "waybackurls", "hakrawler"];

/// One URL discovery back-end.
#[async_trait]
pub trait UrlSource: Send + Sync {
    async fn discover(&self, domain: &str) -> Result<HashSet<String>, ScanError>;

    /// Source name for logging
    fn source_name(&self) -> &str;
}

/// Merges every back-end's URLs for a domain and keeps the injectable ones.
pub struct UrlHarvester {
    sources: Vec<Arc<dyn UrlSource>>,
}

impl UrlHarvester {
    pub fn new(sources: Vec<Arc<dyn UrlSource>>) -> Self {
        Self { sources }
    }

    /// gau, waybackurls and hakrawler.
    pub fn with_default_tools(tool_timeout: Duration) -> Self {
        Self::new(vec![
            Arc::new(ExternalTool::gau(tool_timeout)),
            Arc::new(ExternalTool::waybackurls(tool_timeout)),
            Arc::new(ExternalTool::hakrawler(tool_timeout)),
        ])
    }

    /// Candidate URLs for `domain`, sorted. A failing back-end contributes nothing.
    pub async fn harvest(&self, domain: &str) -> Vec<String> {
        let results = join_all(self.sources.iter().map(|s| s.discover(domain))).await;

        let mut merged = HashSet::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(urls) => merged.extend(urls),
                Err(e) => warn!(source = source.source_name(), domain, error = %e, "URL source failed"),
            }
        }
        filter_query_urls(merged, domain)
    }
}

/// URLs that mention `domain`, carry a query assignment and use an http(s) scheme.
pub fn filter_query_urls(urls: impl IntoIterator<Item = String>, domain: &str) -> Vec<String> {
    urls.into_iter()
        .filter(|u| u.contains(domain) && u.contains('=') && u.starts_with("http"))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(Vec<&'static str>);

    #[async_trait]
    impl UrlSource for StaticSource {
        async fn discover(&self, _domain: &str) -> Result<HashSet<String>, ScanError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
        fn source_name(&self) -> &str { "static" }
    }

    struct FailingSource;

    #[async_trait]
    impl UrlSource for FailingSource {
        async fn discover(&self, _domain: &str) -> Result<HashSet<String>, ScanError> {
            Err(ScanError::Tool("not installed".into()))
        }
        fn source_name(&self) -> &str { "failing" }
    }

    #[test]
    fn test_filter_query_urls() {
        let urls = vec![
            "https://a.hu/x?id=1".to_string(),
            "https://a.hu/static.css".to_string(),
            "https://b.hu/x?id=1".to_string(),
            "ftp://a.hu/x?id=1".to_string(),
            "https://a.hu/x?id=1".to_string(),
            "http://a.hu/y?q=2".to_string(),
        ];
        assert_eq!(
            filter_query_urls(urls, "a.hu"),
            vec!["http://a.hu/y?q=2", "https://a.hu/x?id=1"]
        );
    }

    #[tokio::test]
    async fn test_harvest_unions_sources_and_isolates_failures() {
        let harvester = UrlHarvester::new(vec![
            Arc::new(StaticSource(vec!["https://a.hu/p?x=1", "https://a.hu/about"])),
            Arc::new(FailingSource),
            Arc::new(StaticSource(vec!["https://a.hu/p?x=1", "https://a.hu/q?y=2"])),
        ]);
        let urls = harvester.harvest("a.hu").await;
        assert_eq!(urls, vec!["https://a.hu/p?x=1", "https://a.hu/q?y=2"]);
    }

    #[tokio::test]
    async fn test_harvest_all_sources_failing_is_empty() {
        let harvester = UrlHarvester::new(vec![Arc::new(FailingSource), Arc::new(FailingSource)]);
        assert!(harvester.harvest("a.hu").await.is_empty());
    }
}
