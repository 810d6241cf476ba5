//! CLI module for ingestguard
//!
//! Provides command-line interface for:
//! - check-grammar: Validate one grammar file
//! - check-data: Validate one data file against its grammar
//! - bulk: Validate every pair in a tar or zip archive

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{bulk, check_data, check_grammar, execute, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
