pub mod commands;
pub mod scan;
pub mod tools;

pub use commands::Cli;
