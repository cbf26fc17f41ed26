use super::types::ScanError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl ScanError {
    /// Classify this error to determine its type and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Retryable errors
            ScanError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            ScanError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            ScanError::Upstream(_) => ErrorClassification {
                error_type: "UpstreamError",
                retryable: true,
            },
            ScanError::Http(_) => ErrorClassification {
                error_type: "HttpError",
                retryable: true,
            },

            // Non-retryable errors
            ScanError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            ScanError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                retryable: false,
            },
            ScanError::Report(_) => ErrorClassification {
                error_type: "ReportError",
                retryable: false,
            },
            ScanError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },

            ScanError::Tool(_) => ErrorClassification {
                error_type: "ToolError",
                retryable: false,
            },
            ScanError::Cache(_) => ErrorClassification {
                error_type: "CacheError",
                retryable: false,
            },
            ScanError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },
            ScanError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: true,
            },
            ScanError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }

    /// Transport-level failures: the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ScanError::Network(_) | ScanError::Timeout(_) | ScanError::Http(_))
    }
}

/// Map a reqwest failure onto the scan error taxonomy.
pub fn from_request_error(err: reqwest::Error) -> ScanError {
    if err.is_timeout() {
        ScanError::Timeout(err.to_string())
    } else if err.is_connect() || err.is_request() {
        ScanError::Network(err.to_string())
    } else {
        ScanError::Http(err)
    }
}
