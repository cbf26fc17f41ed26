pub mod loader;

pub use loader::{load_payloads, FALLBACK_PAYLOADS};
