//! Grammar self-consistency checks
//!
//! Three independent checks, run in this order and concatenated:
//! 1. Column count: every line matches the role line's cell count
//! 2. Role markers: each role cell is in the vocabulary, then at least one
//!    key marker on the line as a whole
//! 3. Types: each type cell is in the type vocabulary
//!
//! Checks never short-circuit each other.

use serde_json::{json, Value};

use super::errors::{Column, ValidationError, ValidationResult};
use super::lexical::lacks_key_marker;
use crate::grammar::{ErrorKind, GrammarDocument, Line, RuleSet};

/// Validates a parsed grammar against one variant's rule set.
///
/// The validator does not mutate the document. Validation is deterministic.
pub struct SchemaValidator<'a> {
    rules: &'a RuleSet,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Runs all grammar checks and returns every finding.
    pub fn validate(&self, document: &GrammarDocument) -> ValidationResult {
        let mut errors = self.check_column_counts(document);
        errors.extend(self.check_role_markers(&document.role_line));
        errors.extend(self.check_data_types(&document.type_line));
        errors
    }

    /// Flags every line whose cell count differs from the role line.
    ///
    /// Missing metadata lines count as zero cells.
    pub fn check_column_counts(&self, document: &GrammarDocument) -> ValidationResult {
        let expected = document.expected_columns();
        let code = self.rules.code(ErrorKind::ColumnCount);

        document
            .lines()
            .filter(|line| line.len() != expected)
            .map(|line| column_count_error(line, expected, code))
            .collect()
    }

    /// Validates role cells one by one, then the key-marker rule for the line.
    pub fn check_role_markers(&self, role_line: &Line) -> ValidationResult {
        let code = self.rules.code(ErrorKind::InvalidRole);
        let data = cells_value(role_line);

        let mut errors: ValidationResult = role_line
            .cells
            .iter()
            .enumerate()
            .filter(|(_, marker)| !self.rules.allows_marker(marker))
            .map(|(col, marker)| {
                ValidationError::at(
                    role_line.number,
                    Column::Index(col),
                    code,
                    format!(
                        "Invalid role marker at column {}: first row may only contain {} but found \"{}\"",
                        col + 1,
                        self.rules.role_vocabulary(),
                        marker
                    ),
                    data.clone(),
                )
            })
            .collect();

        if lacks_key_marker(&role_line.cells, self.rules) {
            errors.push(ValidationError::document(
                code,
                format!(
                    "{} should contain at least one {} field",
                    self.rules.label,
                    self.rules.key_vocabulary()
                ),
                data,
            ));
        }

        errors
    }

    /// Flags type cells outside the type vocabulary.
    pub fn check_data_types(&self, type_line: &Line) -> ValidationResult {
        let code = self.rules.code(ErrorKind::InvalidDataType);
        let data = cells_value(type_line);

        type_line
            .cells
            .iter()
            .enumerate()
            .filter(|(_, literal)| self.rules.data_type(literal).is_none())
            .map(|(col, literal)| {
                ValidationError::at(
                    type_line.number,
                    Column::Index(col),
                    code,
                    format!(
                        "Invalid data type at column {}: Only {} are allowed but found '{}'",
                        col + 1,
                        self.rules.type_vocabulary(),
                        literal
                    ),
                    data.clone(),
                )
            })
            .collect()
    }
}

/// Column-count finding shared by the grammar and data checks
pub(crate) fn column_count_error(line: &Line, expected: usize, code: u16) -> ValidationError {
    ValidationError::at(
        line.number,
        Column::Index(0),
        code,
        format!(
            "Line {}: Invalid number of columns {} (expected {}), {}",
            line.number,
            line.len(),
            expected,
            line.cells.join(",")
        ),
        cells_value(line),
    )
}

pub(crate) fn cells_value(line: &Line) -> Value {
    json!(line.cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarParser, DIMENSION_RULES, EVENT_RULES};

    fn dimension(text: &str) -> ValidationResult {
        SchemaValidator::new(&DIMENSION_RULES).validate(&GrammarParser::parse(text))
    }

    fn event(text: &str) -> ValidationResult {
        SchemaValidator::new(&EVENT_RULES).validate(&GrammarParser::parse(text))
    }

    #[test]
    fn test_valid_dimension_grammar() {
        assert!(dimension("PK,,Index\nstring,number,integer\nid,amount,idx").is_empty());
    }

    #[test]
    fn test_invalid_role_marker_and_missing_key() {
        let errors = dimension("X,,\nstring,string,string\na,b,c");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].error_code, 1003);
        assert_eq!(errors[0].column, Column::Index(0));
        assert_eq!(errors[0].row, 1);
        assert!(errors[0].message.contains("\"X\""));

        assert_eq!(errors[1].error_code, 1003);
        assert_eq!(errors[1].row, -1);
        assert_eq!(errors[1].column, Column::Common);
    }

    #[test]
    fn test_all_empty_role_line_reports_only_aggregate() {
        let errors = dimension(",,\nstring,string,string\na,b,c");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_document_level());
    }

    #[test]
    fn test_invalid_type_reports_column_index() {
        let errors = dimension("PK,,\nstring,boolean,integer\na,b,c");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code, 1002);
        assert_eq!(errors[0].column, Column::Index(1));
        assert_eq!(errors[0].row, 2);
        assert!(errors[0].message.contains("'boolean'"));
    }

    #[test]
    fn test_short_type_line() {
        // Type line has 2 cells against 3 declared columns
        let errors = dimension("PK,,\nstring,boolean\na,b,c");

        let codes: Vec<u16> = errors.iter().map(|e| e.error_code).collect();
        assert_eq!(codes, vec![2003, 1002]);
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[1].column, Column::Index(1));
    }

    #[test]
    fn test_column_count_checks_every_line() {
        let errors = dimension("PK,\nstring,string\na,b\n1,2\n3");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code, 2003);
        assert_eq!(errors[0].row, 5);
        assert_eq!(errors[0].data, json!(["3"]));
        assert!(errors[0].message.contains("Invalid number of columns 1 (expected 2)"));
    }

    #[test]
    fn test_all_categories_reported_in_order() {
        let errors = dimension("X,\nstring,date\na,b,c");

        let codes: Vec<u16> = errors.iter().map(|e| e.error_code).collect();
        assert_eq!(codes, vec![2003, 1003, 1003, 1002]);
        assert!(errors[2].is_document_level());
    }

    #[test]
    fn test_missing_lines_surface_as_findings() {
        let errors = dimension("PK,Index");

        // Missing type and name lines have zero cells
        let codes: Vec<u16> = errors.iter().map(|e| e.error_code).collect();
        assert_eq!(codes, vec![2003, 2003]);
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[1].row, 3);
        assert_eq!(errors[0].data, json!([]));

        let errors = dimension("");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_document_level());
    }

    #[test]
    fn test_event_rules() {
        assert!(event("FK,Timestamp,\nstring,string,integer\nstate,ts,count").is_empty());

        let errors = event("PK,,\nstring,string,integer\na,b,c");
        let codes: Vec<u16> = errors.iter().map(|e| e.error_code).collect();
        assert_eq!(codes, vec![3003, 3003]);
        assert!(errors[1].message.contains("Event"));
        assert!(errors[1].message.contains("FK"));

        let errors = event("FK,\nstring\na,b");
        let codes: Vec<u16> = errors.iter().map(|e| e.error_code).collect();
        assert_eq!(codes, vec![4003]);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let text = "X,Index\nstring,float\na";
        let first = dimension(text);
        for _ in 0..10 {
            assert_eq!(dimension(text), first);
        }
    }
}
