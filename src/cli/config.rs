//! Configuration file
//!
//! Optional JSON file; every field has a default.
//!
//! ```json
//! {
//!   "scratch_dir": "/var/tmp/ingest",
//!   "grammar_suffix": ".grammar.csv",
//!   "data_suffix": ".data.csv",
//!   "workers": 4,
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bulk::{BulkProcessor, SuffixConvention, DEFAULT_DATA_SUFFIX, DEFAULT_GRAMMAR_SUFFIX};
use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root for per-batch scratch directories (default: OS temp dir)
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Suffix marking grammar files in an archive
    #[serde(default = "default_grammar_suffix")]
    pub grammar_suffix: String,

    /// Suffix marking data files in an archive
    #[serde(default = "default_data_suffix")]
    pub data_suffix: String,

    /// Pairs validated concurrently (default: 1)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_grammar_suffix() -> String {
    DEFAULT_GRAMMAR_SUFFIX.to_string()
}

fn default_data_suffix() -> String {
    DEFAULT_DATA_SUFFIX.to_string()
}

fn default_workers() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            grammar_suffix: default_grammar_suffix(),
            data_suffix: default_data_suffix(),
            workers: default_workers(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.grammar_suffix.is_empty() || self.data_suffix.is_empty() {
            return Err(CliError::config_error(
                "grammar_suffix and data_suffix must not be empty",
            ));
        }

        if self.grammar_suffix == self.data_suffix {
            return Err(CliError::config_error(format!(
                "grammar_suffix and data_suffix must differ (both '{}')",
                self.grammar_suffix
            )));
        }

        if self.workers == 0 {
            return Err(CliError::config_error("workers must be >= 1"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::from_name(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            ))
        })
    }

    /// Bulk processor honoring scratch root, suffixes and worker count
    pub fn bulk_processor(&self) -> BulkProcessor {
        BulkProcessor::new(&self.scratch_dir)
            .with_convention(SuffixConvention::new(
                self.grammar_suffix.as_str(),
                self.data_suffix.as_str(),
            ))
            .with_workers(self.workers)
    }
}
