use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "scan": {
                "type": "object",
                "properties": {
                    "threads": { "type": "integer", "minimum": 1 },
                    "url_workers": { "type": "integer", "minimum": 1 },
                    "max_in_flight": { "type": "integer", "minimum": 1 },
                    "max_errors": { "type": "integer", "minimum": 0 },
                    "max_hits": { "type": "integer", "minimum": 1 },
                    "verify_tls": { "type": "boolean" },
                    "interrupt": { "type": "string", "enum": ["discard", "flush-partial"] },
                    "live_only": { "type": "boolean" }
                }
            },
            "discovery": {
                "type": "object",
                "properties": {
                    "tld": { "type": "string", "minLength": 1 },
                    "limit": { "type": "integer", "minimum": 1 },
                    "use_cache": { "type": "boolean" },
                    "cache_dir": { "type": "string" }
                }
            },
            "harvest": {
                "type": "object",
                "properties": {
                    "tool_timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "payloads": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" },
                    "html": { "type": "string" }
                }
            }
        }
    })
});
