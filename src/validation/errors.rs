//! Validation findings
//!
//! Wire shape of one finding (stable):
//!
//! ```text
//! { row: number, col: number | "common", errorCode: number, error: string, data: any }
//! ```
//!
//! `row = -1` with `col = "common"` marks a whole-document finding.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Row value for whole-document findings
pub const DOCUMENT_ROW: i64 = -1;

/// Column a finding points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// 0-based column index
    Index(usize),
    /// Finding about the line as a whole
    Common,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Index(i) => write!(f, "{}", i),
            Column::Common => write!(f, "common"),
        }
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Column::Index(i) => serializer.serialize_u64(*i as u64),
            Column::Common => serializer.serialize_str("common"),
        }
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnVisitor;

        impl<'de> Visitor<'de> for ColumnVisitor {
            type Value = Column;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a column index or \"common\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Column, E> {
                Ok(Column::Index(v as usize))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Column, E> {
                usize::try_from(v)
                    .map(Column::Index)
                    .map_err(|_| E::custom(format!("negative column index {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Column, E> {
                if v == "common" {
                    Ok(Column::Common)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(ColumnVisitor)
    }
}

/// One positional validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based line number, or -1 for whole-document findings
    pub row: i64,
    #[serde(rename = "col")]
    pub column: Column,
    #[serde(rename = "errorCode")]
    pub error_code: u16,
    #[serde(rename = "error")]
    pub message: String,
    /// Offending line cells or cell value
    pub data: Value,
}

impl ValidationError {
    /// Finding about a specific line
    pub fn at(
        row: usize,
        column: Column,
        error_code: u16,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            row: row as i64,
            column,
            error_code,
            message: message.into(),
            data,
        }
    }

    /// Whole-document finding (`row = -1`, `col = "common"`)
    pub fn document(error_code: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            row: DOCUMENT_ROW,
            column: Column::Common,
            error_code,
            message: message.into(),
            data,
        }
    }

    pub fn is_document_level(&self) -> bool {
        self.row == DOCUMENT_ROW
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] row {}, col {}: {}",
            self.error_code, self.row, self.column, self.message
        )
    }
}

/// Ordered findings; empty means valid
pub type ValidationResult = Vec<ValidationError>;
