//! Grammar type definitions
//!
//! Supported column types:
//! - string: any content
//! - number: integer or decimal literal
//! - integer: digits with an optional leading sign
//!
//! Column roles depend on the variant rule set (see `rules`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::parser::GrammarDocument;
use super::rules::RuleSet;

/// Declared column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Any content
    String,
    /// Integer or decimal literal
    Number,
    /// Integer literal, no decimal point
    Integer,
}

impl DataType {
    /// Returns the literal used in the type line
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Integer => "integer",
        }
    }

    /// Parses a type-line literal. Matching is exact and case-sensitive.
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "string" => Some(DataType::String),
            "number" => Some(DataType::Number),
            "integer" => Some(DataType::Integer),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Column role declared in the role line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Empty cell
    None,
    /// Dimension primary key (`PK`)
    PrimaryKey,
    /// Dimension secondary index (`Index`)
    Index,
    /// Event column referencing a dimension key (`FK`)
    ForeignKey,
    /// Event time column (`Timestamp`)
    Timestamp,
}

impl Role {
    /// Returns the literal used in the role line
    pub fn marker(&self) -> &'static str {
        match self {
            Role::None => "",
            Role::PrimaryKey => "PK",
            Role::Index => "Index",
            Role::ForeignKey => "FK",
            Role::Timestamp => "Timestamp",
        }
    }

    /// Parses a role-line literal regardless of variant.
    ///
    /// Whether the role is allowed is decided by the variant's `RuleSet`.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "" => Some(Role::None),
            "PK" => Some(Role::PrimaryKey),
            "Index" => Some(Role::Index),
            "FK" => Some(Role::ForeignKey),
            "Timestamp" => Some(Role::Timestamp),
            _ => None,
        }
    }
}

/// A single text line with its 1-based position in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    /// Comma-separated cells
    pub cells: Vec<String>,
}

impl Line {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self { number, cells }
    }

    /// A missing line: no cells, nominal position
    pub fn empty(number: usize) -> Self {
        Self {
            number,
            cells: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Column definition derived from the three metadata lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name from the name line
    pub name: String,
    /// Declared type. `None` when the type-line literal is invalid; such
    /// columns accept any content.
    pub data_type: Option<DataType>,
    /// Declared role. Roles outside the variant vocabulary map to `Role::None`.
    pub role: Role,
}

/// Ordered column schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Builds a schema from a parsed grammar.
    ///
    /// One field per role-line cell; the role line fixes the expected
    /// column count for every other line.
    pub fn from_document(document: &GrammarDocument, rules: &RuleSet) -> Self {
        let fields = document
            .role_line
            .cells
            .iter()
            .enumerate()
            .map(|(i, marker)| {
                let role = Role::from_marker(marker)
                    .filter(|role| rules.allows_role(*role))
                    .unwrap_or(Role::None);
                let data_type = document
                    .type_line
                    .cells
                    .get(i)
                    .and_then(|literal| DataType::from_literal(literal));
                let name = document.name_line.cells.get(i).cloned().unwrap_or_default();

                Field {
                    name,
                    data_type,
                    role,
                }
            })
            .collect();

        Self { fields }
    }

    /// Number of declared columns
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if `cells` repeat the declared column names in order
    pub fn is_header(&self, cells: &[String]) -> bool {
        !self.fields.is_empty()
            && cells.len() == self.fields.len()
            && self
                .fields
                .iter()
                .zip(cells)
                .all(|(field, cell)| field.name == cell.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parser::GrammarParser;
    use crate::grammar::rules::{DIMENSION_RULES, EVENT_RULES};

    #[test]
    fn test_data_type_literals() {
        assert_eq!(DataType::from_literal("string"), Some(DataType::String));
        assert_eq!(DataType::from_literal("number"), Some(DataType::Number));
        assert_eq!(DataType::from_literal("integer"), Some(DataType::Integer));
        assert_eq!(DataType::from_literal("Integer"), None);
        assert_eq!(DataType::from_literal("boolean"), None);
        assert_eq!(DataType::Integer.type_name(), "integer");
    }

    #[test]
    fn test_role_markers_roundtrip() {
        for role in [
            Role::None,
            Role::PrimaryKey,
            Role::Index,
            Role::ForeignKey,
            Role::Timestamp,
        ] {
            assert_eq!(Role::from_marker(role.marker()), Some(role));
        }
        assert_eq!(Role::from_marker("pk"), None);
    }

    #[test]
    fn test_schema_from_document() {
        let doc = GrammarParser::parse("PK,,Index\nstring,number,integer\nid,amount,idx");
        let schema = Schema::from_document(&doc, &DIMENSION_RULES);

        assert_eq!(schema.field_count(), 3);
        assert_eq!(schema.fields[0].name, "id");
        assert_eq!(schema.fields[0].role, Role::PrimaryKey);
        assert_eq!(schema.fields[1].data_type, Some(DataType::Number));
        assert_eq!(schema.fields[2].role, Role::Index);
    }

    #[test]
    fn test_schema_invalid_type_is_unconstrained() {
        let doc = GrammarParser::parse("PK,\nstring,boolean\nid,flag");
        let schema = Schema::from_document(&doc, &DIMENSION_RULES);
        assert_eq!(schema.fields[1].data_type, None);
    }

    #[test]
    fn test_schema_role_outside_vocabulary_maps_to_none() {
        let doc = GrammarParser::parse("PK,FK\nstring,string\na,b");
        let schema = Schema::from_document(&doc, &DIMENSION_RULES);
        assert_eq!(schema.fields[1].role, Role::None);

        let schema = Schema::from_document(&doc, &EVENT_RULES);
        assert_eq!(schema.fields[0].role, Role::None);
        assert_eq!(schema.fields[1].role, Role::ForeignKey);
    }

    #[test]
    fn test_is_header() {
        let doc = GrammarParser::parse("PK,\nstring,integer\nid,count");
        let schema = Schema::from_document(&doc, &DIMENSION_RULES);

        assert!(schema.is_header(&["id".to_string(), "count".to_string()]));
        assert!(!schema.is_header(&["id".to_string(), "7".to_string()]));
        assert!(!schema.is_header(&["id".to_string()]));
    }
}
