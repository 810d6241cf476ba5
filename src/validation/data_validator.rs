//! Data rows against a grammar schema
//!
//! For each row:
//! - cell count must equal the schema field count (column-count code)
//! - each `integer` / `number` cell must match its lexical form
//!   (data-conformance code)
//!
//! Rows with the wrong cell count are not type-checked.

use serde_json::Value;

use super::errors::{Column, ValidationError, ValidationResult};
use super::lexical::conforms;
use super::schema_validator::column_count_error;
use crate::grammar::{ErrorKind, Line, RuleSet, Schema};

/// Checks data rows against a schema. Read-only; returns fresh findings per call.
pub struct DataValidator<'a> {
    rules: &'a RuleSet,
    schema: &'a Schema,
}

impl<'a> DataValidator<'a> {
    pub fn new(rules: &'a RuleSet, schema: &'a Schema) -> Self {
        Self { rules, schema }
    }

    /// Validates rows in order.
    ///
    /// A first row repeating the schema's column names is treated as a
    /// header and skipped.
    pub fn validate(&self, rows: &[Line]) -> ValidationResult {
        self.body(rows)
            .iter()
            .flat_map(|row| self.validate_row(row))
            .collect()
    }

    /// Type-checks rows embedded after a grammar's name line.
    ///
    /// Rows of the wrong width are skipped; the grammar column-count check
    /// already reports them.
    pub fn validate_embedded(&self, rows: &[Line]) -> ValidationResult {
        let expected = self.schema.field_count();

        self.body(rows)
            .iter()
            .filter(|row| row.len() == expected)
            .flat_map(|row| self.validate_row(row))
            .collect()
    }

    fn body<'r>(&self, rows: &'r [Line]) -> &'r [Line] {
        match rows.first() {
            Some(first) if self.schema.is_header(&first.cells) => &rows[1..],
            _ => rows,
        }
    }

    /// Validates a single row.
    pub fn validate_row(&self, row: &Line) -> ValidationResult {
        let expected = self.schema.field_count();
        if row.len() != expected {
            return vec![column_count_error(
                row,
                expected,
                self.rules.code(ErrorKind::ColumnCount),
            )];
        }

        let code = self.rules.code(ErrorKind::DataConformance);

        self.schema
            .fields
            .iter()
            .zip(&row.cells)
            .enumerate()
            .filter_map(|(col, (field, cell))| {
                let data_type = field.data_type?;
                if conforms(cell, data_type) {
                    return None;
                }
                Some(ValidationError::at(
                    row.number,
                    Column::Index(col),
                    code,
                    format!(
                        "Line {}: Invalid value '{}' at column {} ({}): expected {}",
                        row.number,
                        cell,
                        col + 1,
                        field.name,
                        data_type
                    ),
                    Value::String(cell.clone()),
                ))
            })
            .collect()
    }
}
