//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::{Logger, Severity};

/// Observable events during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Single-file checks
    /// Grammar-only check finished
    GrammarChecked,
    /// Grammar + data check finished
    DataChecked,
    /// Variant discriminator rejected
    DispatchRejected,

    // Bulk processing
    /// Archive opened, scratch allocated
    BulkStart,
    /// One pair validated
    BulkPairValidated,
    /// One pair could not be processed
    BulkPairFailed,
    /// Every pair attempted
    BulkComplete,
    /// Archive could not be read
    BulkAborted,
    /// Scratch directory could not be removed
    ScratchCleanupFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::GrammarChecked => "GRAMMAR_CHECK",
            Event::DataChecked => "DATA_CHECK",
            Event::DispatchRejected => "DISPATCH_REJECTED",
            Event::BulkStart => "BULK_BEGIN",
            Event::BulkPairValidated => "BULK_PAIR",
            Event::BulkPairFailed => "BULK_PAIR_FAILED",
            Event::BulkComplete => "BULK_COMPLETE",
            Event::BulkAborted => "BULK_ABORTED",
            Event::ScratchCleanupFailed => "SCRATCH_CLEANUP_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::GrammarChecked | Event::DataChecked | Event::BulkPairValidated => {
                Severity::Trace
            }
            Event::ConfigLoaded | Event::BulkStart | Event::BulkComplete => Severity::Info,
            Event::DispatchRejected | Event::BulkPairFailed | Event::ScratchCleanupFailed => {
                Severity::Warn
            }
            Event::BulkAborted => Severity::Error,
        }
    }

    /// Logs the event at its own severity
    pub fn emit(&self, fields: &[(&str, &str)]) {
        Logger::log(self.severity(), self.as_str(), fields);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
