//! CLI layer for the FAQ agent.
//!
//! Provides the command-line interface using clap: invoking the agent,
//! serving the HTTP contract, and running the FAQ tools directly.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
#[cfg(feature = "mcp")]
pub use parser::McpCommands;
pub use parser::{Cli, Commands};
