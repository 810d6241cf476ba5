//! Variant dispatch
//!
//! Routes a check to the Dimension or Event rule set. Both variants run the
//! same pipeline:
//!
//! ```text
//! GrammarParser -> SchemaValidator [-> DataValidator]
//! ```
//!
//! Grammar findings are reported even when data also fails; validation
//! never stops at the first failing stage.

mod errors;

pub use errors::{DispatchError, DispatchResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grammar::{
    parse_data_rows, GrammarParser, RuleSet, Schema, DIMENSION_RULES, EVENT_RULES,
};
use crate::observability::Event;
use crate::validation::{DataValidator, SchemaValidator, ValidationResult};

/// Supported data categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Dimension,
    Event,
}

impl Variant {
    /// Discriminator literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Dimension => "dimension",
            Variant::Event => "event",
        }
    }

    /// Immutable rule table for this variant
    pub fn rules(&self) -> &'static RuleSet {
        match self {
            Variant::Dimension => &DIMENSION_RULES,
            Variant::Event => &EVENT_RULES,
        }
    }

    /// Grammar-only check
    pub fn check_grammar(&self, grammar: &str) -> ValidationResult {
        let rules = self.rules();
        let document = GrammarParser::parse(grammar);
        let errors = SchemaValidator::new(rules).validate(&document);

        let count = errors.len().to_string();
        Event::GrammarChecked.emit(&[("variant", self.as_str()), ("findings", count.as_str())]);
        errors
    }

    /// Grammar check followed by a data check; findings are concatenated
    /// in that order.
    ///
    /// Rows trailing the grammar's name line are data too. They are checked
    /// before the rows of `data` and keep their grammar line numbers.
    pub fn check_data(&self, grammar: &str, data: &str) -> ValidationResult {
        let rules = self.rules();
        let document = GrammarParser::parse(grammar);

        let mut errors = SchemaValidator::new(rules).validate(&document);
        let schema = Schema::from_document(&document, rules);
        let validator = DataValidator::new(rules, &schema);
        errors.extend(validator.validate_embedded(&document.data_lines));
        errors.extend(validator.validate(&parse_data_rows(data)));

        let count = errors.len().to_string();
        Event::DataChecked.emit(&[("variant", self.as_str()), ("findings", count.as_str())]);
        errors
    }
}

impl FromStr for Variant {
    type Err = DispatchError;

    /// Leading and trailing whitespace is ignored; matching is exact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dimension" => Ok(Variant::Dimension),
            "event" => Ok(Variant::Event),
            other => {
                Event::DispatchRejected.emit(&[("variant", other)]);
                Err(DispatchError::UnknownVariant(other.to_string()))
            }
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entry points keyed by variant
///
/// Stateless; every call parses its inputs fresh.
#[derive(Debug, Default, Clone, Copy)]
pub struct VariantDispatcher;

impl VariantDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Grammar-only check for a caller-supplied discriminator
    pub fn check_grammar(&self, variant: &str, grammar: &str) -> DispatchResult<ValidationResult> {
        let variant: Variant = variant.parse()?;
        Ok(variant.check_grammar(grammar))
    }

    /// Grammar + data check for a caller-supplied discriminator
    pub fn check_data(
        &self,
        variant: &str,
        grammar: &str,
        data: &str,
    ) -> DispatchResult<ValidationResult> {
        let variant: Variant = variant.parse()?;
        Ok(variant.check_data(grammar, data))
    }

    pub fn check_dimension_grammar(&self, grammar: &str) -> ValidationResult {
        Variant::Dimension.check_grammar(grammar)
    }

    pub fn check_event_grammar(&self, grammar: &str) -> ValidationResult {
        Variant::Event.check_grammar(grammar)
    }

    pub fn check_dimension_data(&self, grammar: &str, data: &str) -> ValidationResult {
        Variant::Dimension.check_data(grammar, data)
    }

    pub fn check_event_data(&self, grammar: &str, data: &str) -> ValidationResult {
        Variant::Event.check_data(grammar, data)
    }
}
