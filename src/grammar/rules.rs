//! Variant rule sets
//!
//! Both variants use the same three metadata lines (role, type, name) and
//! the same type vocabulary. They differ in role vocabulary, in which
//! markers satisfy the key-column rule, and in error codes.
//!
//! | kind              | dimension | event |
//! |-------------------|-----------|-------|
//! | invalid type      | 1002      | 3002  |
//! | invalid role      | 1003      | 3003  |
//! | column count      | 2003      | 4003  |
//! | data conformance  | 2004      | 4004  |
//!
//! Codes are part of the wire format and must not be renumbered.

use std::fmt;

use super::types::{DataType, Role};

/// Types accepted in the type line, shared by every variant
pub const DATA_TYPES: &[DataType] = &[DataType::String, DataType::Number, DataType::Integer];

/// Finding categories that carry a numeric error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Type-line literal outside the type vocabulary
    InvalidDataType,
    /// Role-line literal outside the role vocabulary, or no key marker
    InvalidRole,
    /// Line cell count differs from the role line
    ColumnCount,
    /// Data cell does not match its declared type
    DataConformance,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidDataType => "INVALID_DATA_TYPE",
            ErrorKind::InvalidRole => "INVALID_ROLE",
            ErrorKind::ColumnCount => "COLUMN_COUNT",
            ErrorKind::DataConformance => "DATA_CONFORMANCE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric error codes reserved to one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCodes {
    pub invalid_data_type: u16,
    pub invalid_role: u16,
    pub column_count: u16,
    pub data_conformance: u16,
}

impl ErrorCodes {
    pub fn code(&self, kind: ErrorKind) -> u16 {
        match kind {
            ErrorKind::InvalidDataType => self.invalid_data_type,
            ErrorKind::InvalidRole => self.invalid_role,
            ErrorKind::ColumnCount => self.column_count,
            ErrorKind::DataConformance => self.data_conformance,
        }
    }

    /// All codes in declaration order
    pub fn all(&self) -> [u16; 4] {
        [
            self.invalid_data_type,
            self.invalid_role,
            self.column_count,
            self.data_conformance,
        ]
    }
}

/// Immutable validation rules for one grammar dialect
#[derive(Debug)]
pub struct RuleSet {
    /// Display name used in messages ("Dimension", "Event")
    pub label: &'static str,
    /// Roles allowed in the role line; `Role::None` is the empty cell
    pub roles: &'static [Role],
    /// Roles of which at least one must appear in the role line
    pub key_roles: &'static [Role],
    pub data_types: &'static [DataType],
    pub codes: ErrorCodes,
}

impl RuleSet {
    /// Returns true if `role` belongs to this variant's vocabulary
    pub fn allows_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if the role-line literal is in the vocabulary
    pub fn allows_marker(&self, marker: &str) -> bool {
        Role::from_marker(marker).map_or(false, |role| self.allows_role(role))
    }

    /// Returns true if the role-line literal is a key marker
    pub fn is_key_marker(&self, marker: &str) -> bool {
        Role::from_marker(marker).map_or(false, |role| self.key_roles.contains(&role))
    }

    /// Returns the declared type for a type-line literal, if allowed
    pub fn data_type(&self, literal: &str) -> Option<DataType> {
        DataType::from_literal(literal).filter(|t| self.data_types.contains(t))
    }

    pub fn code(&self, kind: ErrorKind) -> u16 {
        self.codes.code(kind)
    }

    /// Quoted, comma-joined list of the non-empty role markers
    pub fn role_vocabulary(&self) -> String {
        quoted_list(
            self.roles
                .iter()
                .filter(|role| **role != Role::None)
                .map(|role| role.marker()),
        )
    }

    /// Quoted list of the key markers joined with "or"
    pub fn key_vocabulary(&self) -> String {
        self.key_roles
            .iter()
            .map(|role| role.marker())
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// Quoted, comma-joined list of the type vocabulary
    pub fn type_vocabulary(&self) -> String {
        quoted_list(self.data_types.iter().map(|t| t.type_name()))
    }
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.map(|item| format!("'{}'", item)).collect();
    match quoted.len() {
        0 => String::new(),
        1 => quoted[0].clone(),
        n => format!("{}, and {}", quoted[..n - 1].join(", "), quoted[n - 1]),
    }
}

/// Dimension grammar: `PK` / `Index` keys
pub static DIMENSION_RULES: RuleSet = RuleSet {
    label: "Dimension",
    roles: &[Role::None, Role::PrimaryKey, Role::Index],
    key_roles: &[Role::PrimaryKey, Role::Index],
    data_types: DATA_TYPES,
    codes: ErrorCodes {
        invalid_data_type: 1002,
        invalid_role: 1003,
        column_count: 2003,
        data_conformance: 2004,
    },
};

/// Event grammar: `FK` columns reference dimensions, `Timestamp` marks event time
pub static EVENT_RULES: RuleSet = RuleSet {
    label: "Event",
    roles: &[Role::None, Role::ForeignKey, Role::Timestamp],
    key_roles: &[Role::ForeignKey],
    data_types: DATA_TYPES,
    codes: ErrorCodes {
        invalid_data_type: 3002,
        invalid_role: 3003,
        column_count: 4003,
        data_conformance: 4004,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dimension_codes_are_stable() {
        assert_eq!(DIMENSION_RULES.code(ErrorKind::InvalidDataType), 1002);
        assert_eq!(DIMENSION_RULES.code(ErrorKind::InvalidRole), 1003);
        assert_eq!(DIMENSION_RULES.code(ErrorKind::ColumnCount), 2003);
        assert_eq!(DIMENSION_RULES.code(ErrorKind::DataConformance), 2004);
    }

    #[test]
    fn test_variant_codes_never_collide() {
        let dimension: HashSet<u16> = DIMENSION_RULES.codes.all().into_iter().collect();
        let event: HashSet<u16> = EVENT_RULES.codes.all().into_iter().collect();

        assert_eq!(dimension.len(), 4);
        assert_eq!(event.len(), 4);
        assert!(dimension.is_disjoint(&event));
    }

    #[test]
    fn test_variants_share_type_vocabulary() {
        assert_eq!(DIMENSION_RULES.data_types, EVENT_RULES.data_types);
        assert_eq!(
            DIMENSION_RULES.type_vocabulary(),
            "'string', 'number', and 'integer'"
        );
    }

    #[test]
    fn test_role_vocabularies() {
        assert!(DIMENSION_RULES.allows_marker(""));
        assert!(DIMENSION_RULES.allows_marker("PK"));
        assert!(DIMENSION_RULES.allows_marker("Index"));
        assert!(!DIMENSION_RULES.allows_marker("FK"));

        assert!(EVENT_RULES.allows_marker("FK"));
        assert!(EVENT_RULES.allows_marker("Timestamp"));
        assert!(!EVENT_RULES.allows_marker("PK"));
    }

    #[test]
    fn test_key_markers() {
        assert!(DIMENSION_RULES.is_key_marker("PK"));
        assert!(DIMENSION_RULES.is_key_marker("Index"));
        assert!(!DIMENSION_RULES.is_key_marker(""));

        assert!(EVENT_RULES.is_key_marker("FK"));
        assert!(!EVENT_RULES.is_key_marker("Timestamp"));
        assert_eq!(EVENT_RULES.key_vocabulary(), "FK");
        assert_eq!(DIMENSION_RULES.key_vocabulary(), "PK or Index");
    }
}
