//! CLI module for the bookstore service
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - init: Write a default configuration file
//! - check-config: Validate and print a configuration file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{check_config, effective_config, init, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
