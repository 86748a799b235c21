//! Presentation layer for toolgraph
//!
//! This crate contains the CLI definitions and the console/JSON
//! formatters for plans, graph snapshots, and analysis reports.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, parse_parameter};
pub use output::console::ConsoleFormatter;
