//! Bulk validation of archived grammar/data pairs
//!
//! # Archive layout
//!
//! ```text
//! batch.tar (or batch.zip)
//! ├── dimension/
//! │   ├── district.grammar.csv
//! │   └── district.data.csv
//! └── event/
//!     ├── attendance.grammar.csv
//!     └── attendance.data.csv
//! ```
//!
//! The top-level directory selects the variant. Each pair yields exactly one
//! report; pair-level problems never abort the batch.

mod errors;
mod pairing;
mod processor;
mod scratch;

pub use errors::{ArchiveError, BulkResult, PairError};
pub use pairing::{
    normalize_entry_path, EntryClass, EntryKind, PairingConvention, SuffixConvention,
    DEFAULT_DATA_SUFFIX, DEFAULT_GRAMMAR_SUFFIX,
};
pub use processor::{BulkProcessor, PairOutcome, PairReport};
pub use scratch::ScratchDir;
