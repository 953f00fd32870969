//! CLI module for tablegate
//!
//! Provides command-line interface for:
//! - init: Write a default config file
//! - serve: Run the HTTP gateway
//! - tables / summary: One-shot catalog reads
//! - exec: One-shot operation from stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exec, init, run, run_command, serve, summary, tables};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
