use serde::{Deserialize, Serialize};

/// YAML configuration file. Every field is optional; CLI flags win over it.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FileConfig {
    pub scan: Option<ScanSection>,
    pub discovery: Option<DiscoverySection>,
    pub harvest: Option<HarvestSection>,
    pub payloads: Option<PayloadSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScanSection {
    pub threads: Option<usize>,
    pub url_workers: Option<usize>,
    pub max_in_flight: Option<usize>,
    pub max_errors: Option<usize>,
    pub max_hits: Option<usize>,
    pub verify_tls: Option<bool>,
    pub interrupt: Option<InterruptPolicy>,
    pub live_only: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DiscoverySection {
    pub tld: Option<String>,
    pub limit: Option<usize>,
    pub use_cache: Option<bool>,
    pub cache_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HarvestSection {
    pub tool_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PayloadSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputSection {
    pub directory: Option<String>,
    /// `auto` or an explicit HTML report path.
    pub html: Option<String>,
}

/// What to do with confirmed findings when the operator interrupts a scan.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptPolicy {
    /// Exit without writing a report.
    #[default]
    Discard,
    /// Write the report from every finding confirmed before the interrupt.
    FlushPartial,
}

impl InterruptPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discard => "discard",
            Self::FlushPartial => "flush-partial",
        }
    }
}

impl std::fmt::Display for InterruptPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
