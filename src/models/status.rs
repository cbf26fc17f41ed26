use serde::{Deserialize, Serialize};

/// Scan progress of one domain. Ordered: a status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Waiting,
    InProgress,
    Done,
}

impl ScanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Waiting => "⏳ WAITING",
            Self::InProgress => "🔄 IN PROGRESS",
            Self::Done => "✅ DONE",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Waiting => "WAITING",
            Self::InProgress => "IN PROGRESS",
            Self::Done => "DONE",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_follows_lifecycle() {
        assert!(ScanStatus::Waiting < ScanStatus::InProgress);
        assert!(ScanStatus::InProgress < ScanStatus::Done);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", ScanStatus::InProgress), "IN PROGRESS");
        assert_eq!(serde_json::to_string(&ScanStatus::InProgress).unwrap(), "\"IN_PROGRESS\"");
    }
}
