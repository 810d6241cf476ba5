//! CLI argument definitions using clap
//!
//! Commands:
//! - ingestguard check-grammar --type <variant> --grammar <path>
//! - ingestguard check-data --type <variant> --grammar <path> --data <path>
//! - ingestguard bulk --archive <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ingestguard - Grammar and data validation for CSV ingestion
#[derive(Parser, Debug)]
#[command(name = "ingestguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a grammar file on its own
    CheckGrammar {
        /// Variant: dimension or event
        #[arg(long = "type", value_name = "VARIANT")]
        variant: String,

        /// Path to the grammar CSV
        #[arg(long)]
        grammar: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a data file against its grammar
    CheckData {
        /// Variant: dimension or event
        #[arg(long = "type", value_name = "VARIANT")]
        variant: String,

        /// Path to the grammar CSV
        #[arg(long)]
        grammar: PathBuf,

        /// Path to the data CSV
        #[arg(long)]
        data: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate every grammar/data pair in a tar or zip archive
    Bulk {
        /// Path to the tar or zip archive
        #[arg(long)]
        archive: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_data() {
        let cli = Cli::try_parse_from([
            "ingestguard",
            "check-data",
            "--type",
            "event",
            "--grammar",
            "g.csv",
            "--data",
            "d.csv",
        ])
        .unwrap();

        match cli.command {
            Command::CheckData {
                variant,
                grammar,
                data,
                config,
            } => {
                assert_eq!(variant, "event");
                assert_eq!(grammar, PathBuf::from("g.csv"));
                assert_eq!(data, PathBuf::from("d.csv"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bulk_requires_archive() {
        assert!(Cli::try_parse_from(["ingestguard", "bulk"]).is_err());
    }

    #[test]
    fn test_variant_is_free_text() {
        // Unknown variants are rejected by dispatch, not by the parser
        let cli = Cli::try_parse_from([
            "ingestguard",
            "check-grammar",
            "--type",
            "widget",
            "--grammar",
            "g.csv",
        ]);
        assert!(cli.is_ok());
    }
}
