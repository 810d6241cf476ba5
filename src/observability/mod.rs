//! Observability subsystem
//!
//! Structured JSON-lines logging with typed events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation results
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use ingestguard::observability::{Event, Logger, ObservationScope};
//!
//! Event::BulkPairValidated.emit(&[("pair", "dimension/district")]);
//!
//! let scope = ObservationScope::new("BULK", &[]);
//! scope.complete(&[("pairs", "4")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;
