use serde::{Deserialize, Serialize};

/// A confirmed payload reflection, as reported by a probe before it is
/// attributed to a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflection {
    /// The injected URL whose response echoed the payload.
    pub vulnerable_url: String,
    pub payload: String,
}

/// A reflected XSS finding. Field names are the JSON report schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub domain: String,
    pub vulnerable_url: String,
    pub payload: String,
}

impl Finding {
    pub fn new(domain: &str, reflection: Reflection) -> Self {
        Self {
            domain: domain.to_string(),
            vulnerable_url: reflection.vulnerable_url,
            payload: reflection.payload,
        }
    }
}
