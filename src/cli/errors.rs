//! CLI-specific error types
//!
//! Every CLI error ends the process with a JSON error object and exit code 1.
//! Validation findings are not errors.

use std::fmt;
use std::io;

use crate::bulk::ArchiveError;
use crate::dispatch::DispatchError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (input files, stdout)
    IoError,
    /// Variant discriminator not recognized
    UnknownVariant,
    /// Archive could not be opened
    ArchiveOpen,
    /// Archive entry stream could not be read
    ArchiveRead,
    /// Scratch directory could not be allocated
    ArchiveScratch,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "INGEST_CLI_CONFIG_ERROR",
            Self::IoError => "INGEST_CLI_IO_ERROR",
            Self::UnknownVariant => "INGEST_DISPATCH_UNKNOWN_VARIANT",
            Self::ArchiveOpen => "INGEST_ARCHIVE_OPEN",
            Self::ArchiveRead => "INGEST_ARCHIVE_READ",
            Self::ArchiveScratch => "INGEST_ARCHIVE_SCRATCH",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DispatchError> for CliError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::UnknownVariant(_) => {
                Self::new(CliErrorCode::UnknownVariant, e.to_string())
            }
        }
    }
}

impl From<ArchiveError> for CliError {
    fn from(e: ArchiveError) -> Self {
        let code = match &e {
            ArchiveError::Open { .. } => CliErrorCode::ArchiveOpen,
            ArchiveError::Read { .. } => CliErrorCode::ArchiveRead,
            ArchiveError::Scratch { .. } => CliErrorCode::ArchiveScratch,
        };
        Self::new(code, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dispatch_code_is_preserved() {
        let dispatch = DispatchError::UnknownVariant("widget".into());
        let expected = dispatch.code();

        let err = CliError::from(dispatch);
        assert_eq!(err.code_str(), expected);
        assert!(err.message().contains("widget"));
    }

    #[test]
    fn test_archive_code_is_preserved() {
        let archive = ArchiveError::Read {
            path: PathBuf::from("batch.tar"),
            source: io::Error::new(io::ErrorKind::InvalidData, "bad header"),
        };
        let expected = archive.code();

        let err = CliError::from(archive);
        assert_eq!(err.code(), &CliErrorCode::ArchiveRead);
        assert_eq!(err.code_str(), expected);
    }

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("workers must be >= 1");
        assert_eq!(
            err.to_string(),
            "INGEST_CLI_CONFIG_ERROR: workers must be >= 1"
        );
    }
}
