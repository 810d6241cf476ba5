//! ingestguard - Grammar and data validation for CSV ingestion
//!
//! A grammar file describes a table in three leading lines (roles, types,
//! names). Checks run against one of two variants, dimension or event, each
//! with its own role vocabulary and error codes.
//!
//! ```ignore
//! use ingestguard::dispatch::VariantDispatcher;
//!
//! let errors = VariantDispatcher::new()
//!     .check_data("dimension", "PK,\nstring,integer\nid,count", "a,1\nb,x")?;
//! assert_eq!(errors[0].error_code, 2004);
//! ```

pub mod bulk;
pub mod cli;
pub mod dispatch;
pub mod grammar;
pub mod observability;
pub mod validation;

pub use bulk::{ArchiveError, BulkProcessor, PairError, PairReport};
pub use dispatch::{DispatchError, Variant, VariantDispatcher};
pub use validation::{ValidationError, ValidationResult};
