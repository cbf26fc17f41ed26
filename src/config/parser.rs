use std::path::Path;
use crate::errors::ScanError;
use super::types::FileConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<FileConfig, ScanError> {
    if !path.exists() {
        return Err(ScanError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ScanError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // An empty file parses to null
    if yaml.is_null() {
        return Ok(FileConfig::default());
    }

    validate_schema(&yaml)?;

    let config: FileConfig = serde_yaml::from_value(yaml)?;
    validate_values(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ScanError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| ScanError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ScanError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only: typed deserialization and validate_values are authoritative
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject values the scanner cannot run with.
pub(crate) fn validate_values(config: &FileConfig) -> Result<(), ScanError> {
    if let Some(scan) = &config.scan {
        for (name, value) in [
            ("scan.threads", scan.threads),
            ("scan.url_workers", scan.url_workers),
            ("scan.max_in_flight", scan.max_in_flight),
            ("scan.max_hits", scan.max_hits),
        ] {
            if value == Some(0) {
                return Err(ScanError::Config(format!("{} must be at least 1", name)));
            }
        }
    }

    if let Some(discovery) = &config.discovery {
        if discovery.tld.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ScanError::Config("discovery.tld must not be empty".into()));
        }
        if discovery.limit == Some(0) {
            return Err(ScanError::Config("discovery.limit must be at least 1".into()));
        }
    }

    if let Some(harvest) = &config.harvest {
        if harvest.tool_timeout_secs == Some(0) {
            return Err(ScanError::Config("harvest.tool_timeout_secs must be at least 1".into()));
        }
    }

    Ok(())
}
