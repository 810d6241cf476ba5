//! Validation subsystem
//!
//! Findings are values, never errors: a grammar or data file that fails
//! every check still yields `Ok` at the dispatch layer with a non-empty
//! `ValidationResult`.
//!
//! # Design Principles
//!
//! - Pure functions returning structured findings, concatenated explicitly
//! - Checks never short-circuit each other
//! - Deterministic ordering: grammar findings, then data findings

mod data_validator;
mod errors;
mod lexical;
mod schema_validator;

pub use data_validator::DataValidator;
pub use errors::{Column, ValidationError, ValidationResult, DOCUMENT_ROW};
pub use lexical::{conforms, is_integer, is_number, lacks_key_marker};
pub use schema_validator::SchemaValidator;
