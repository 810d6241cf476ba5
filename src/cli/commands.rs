//! CLI command implementations
//!
//! Each command loads configuration, runs one check, and prints exactly one
//! JSON object on stdout. Findings are data, not failures: a grammar with
//! errors still exits 0 with `"valid": false`.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::dispatch::Variant;
use crate::observability::{Event, Logger};
use crate::validation::ValidationResult;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a command, printing its response or its error object
pub fn run_command(cmd: Command) -> CliResult<()> {
    match execute(cmd) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run a command and return its response payload
pub fn execute(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::CheckGrammar {
            variant,
            grammar,
            config,
        } => check_grammar(&variant, &grammar, config.as_deref()),
        Command::CheckData {
            variant,
            grammar,
            data,
            config,
        } => check_data(&variant, &grammar, &data, config.as_deref()),
        Command::Bulk { archive, config } => bulk(&archive, config.as_deref()),
    }
}

/// Validate a grammar file
pub fn check_grammar(
    variant: &str,
    grammar_path: &Path,
    config: Option<&Path>,
) -> CliResult<Value> {
    load_config(config)?;
    let variant: Variant = variant.parse()?;
    let grammar = read_input(grammar_path)?;

    validation_payload(&variant.check_grammar(&grammar))
}

/// Validate a data file against its grammar
pub fn check_data(
    variant: &str,
    grammar_path: &Path,
    data_path: &Path,
    config: Option<&Path>,
) -> CliResult<Value> {
    load_config(config)?;
    let variant: Variant = variant.parse()?;
    let grammar = read_input(grammar_path)?;
    let data = read_input(data_path)?;

    validation_payload(&variant.check_data(&grammar, &data))
}

/// Validate every pair in an archive
pub fn bulk(archive_path: &Path, config: Option<&Path>) -> CliResult<Value> {
    let config = load_config(config)?;
    let reports = config.bulk_processor().process_archive(archive_path)?;

    Ok(json!({ "pairs": serde_json::to_value(&reports)? }))
}

/// Loads configuration and applies its log level
fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::resolve(path)?;
    Logger::set_min_severity(config.severity()?);

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    Event::ConfigLoaded.emit(&[
        ("source", source.as_str()),
        ("log_level", config.log_level.as_str()),
    ]);

    Ok(config)
}

fn read_input(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))
}

fn validation_payload(errors: &ValidationResult) -> CliResult<Value> {
    Ok(json!({
        "valid": errors.is_empty(),
        "errors": serde_json::to_value(errors)?,
    }))
}
