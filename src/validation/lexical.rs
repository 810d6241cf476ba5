//! Lexical forms for data cells

use regex::Regex;
use std::sync::OnceLock;

use crate::grammar::{DataType, RuleSet};

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer pattern"))
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$")
            .expect("valid number pattern")
    })
}

/// Digits with an optional leading sign
pub fn is_integer(cell: &str) -> bool {
    integer_pattern().is_match(cell.trim())
}

/// Integer or decimal literal, optional exponent
pub fn is_number(cell: &str) -> bool {
    number_pattern().is_match(cell.trim())
}

/// Returns true if `cell` is a valid literal for `data_type`
pub fn conforms(cell: &str, data_type: DataType) -> bool {
    match data_type {
        DataType::String => true,
        DataType::Number => is_number(cell),
        DataType::Integer => is_integer(cell),
    }
}

/// Returns true if no cell of the role line is a key marker.
///
/// This is not "every cell is empty": `X,,` carries no key marker either.
pub fn lacks_key_marker(cells: &[String], rules: &RuleSet) -> bool {
    !cells.iter().any(|cell| rules.is_key_marker(cell))
}
