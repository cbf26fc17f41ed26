pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod harvest;
pub mod models;
pub mod payloads;
pub mod pipeline;
pub mod progress;
pub mod reporting;
pub mod scanner;
pub mod utils;
