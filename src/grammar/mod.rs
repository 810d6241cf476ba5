//! Grammar subsystem
//!
//! A grammar is the header-only schema description embedded in the leading
//! rows of a tabular file: a role line, a type line and a name line.
//!
//! # Design Principles
//!
//! - Parsing never fails; problems surface as validation findings
//! - One immutable rule table per variant
//! - Nothing is cached between calls

mod parser;
mod rules;
mod types;

pub use parser::{parse_data_rows, GrammarDocument, GrammarParser, METADATA_LINES};
pub use rules::{ErrorCodes, ErrorKind, RuleSet, DATA_TYPES, DIMENSION_RULES, EVENT_RULES};
pub use types::{DataType, Field, Line, Role, Schema};
