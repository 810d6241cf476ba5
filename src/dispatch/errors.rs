//! Dispatch errors
//!
//! An unknown variant discriminator is a hard failure: no findings are
//! produced for the request.

use thiserror::Error;

/// Result type for dispatched checks
pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Unknown variant '{0}': expected 'dimension' or 'event'")]
    UnknownVariant(String),
}

impl DispatchError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::UnknownVariant(_) => "INGEST_DISPATCH_UNKNOWN_VARIANT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_message() {
        let err = DispatchError::UnknownVariant("widget".into());
        assert!(err.to_string().contains("'widget'"));
        assert_eq!(err.code(), "INGEST_DISPATCH_UNKNOWN_VARIANT");
    }
}
