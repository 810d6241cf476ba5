//! Archive entry naming conventions
//!
//! The default convention pairs `<variant>/<name><grammar_suffix>` with
//! `<variant>/<name><data_suffix>`. The pair id is `<variant>/<name>`.

/// Role of a file inside a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Grammar,
    Data,
}

/// How one archive entry relates to the pairing convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryClass {
    /// Part of a grammar/data pair
    Member {
        pair_id: String,
        variant: String,
        kind: EntryKind,
    },
    /// Not part of any pair; skipped silently
    Ignored,
    /// A file that should have been part of a pair but is misnamed
    Mismatch { expected: String },
}

/// Caller-defined mapping from archive entry paths to pairs
pub trait PairingConvention: Send + Sync {
    /// Classifies an entry by its normalized, `/`-separated path
    fn classify(&self, path: &str) -> EntryClass;
}

/// Suffix-based convention with the variant taken from the parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixConvention {
    pub grammar_suffix: String,
    pub data_suffix: String,
}

pub const DEFAULT_GRAMMAR_SUFFIX: &str = ".grammar.csv";
pub const DEFAULT_DATA_SUFFIX: &str = ".data.csv";

impl SuffixConvention {
    pub fn new(grammar_suffix: impl Into<String>, data_suffix: impl Into<String>) -> Self {
        Self {
            grammar_suffix: grammar_suffix.into(),
            data_suffix: data_suffix.into(),
        }
    }

    fn expected(&self) -> String {
        format!(
            "expected <variant>/<name>{} or <variant>/<name>{}",
            self.grammar_suffix, self.data_suffix
        )
    }

    /// Longest matching suffix wins, so `.data.csv` never shadows `.grammar.data.csv`
    fn split_suffix<'p>(&self, path: &'p str) -> Option<(&'p str, EntryKind)> {
        let mut candidates = [
            (self.grammar_suffix.as_str(), EntryKind::Grammar),
            (self.data_suffix.as_str(), EntryKind::Data),
        ];
        candidates.sort_by_key(|(suffix, _)| std::cmp::Reverse(suffix.len()));

        candidates.iter().find_map(|(suffix, kind)| {
            path.strip_suffix(suffix)
                .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
                .map(|stem| (stem, *kind))
        })
    }
}

impl Default for SuffixConvention {
    fn default() -> Self {
        Self::new(DEFAULT_GRAMMAR_SUFFIX, DEFAULT_DATA_SUFFIX)
    }
}

impl PairingConvention for SuffixConvention {
    fn classify(&self, path: &str) -> EntryClass {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        if file_name.is_empty() || file_name.starts_with('.') {
            return EntryClass::Ignored;
        }

        let Some((stem, kind)) = self.split_suffix(path) else {
            return EntryClass::Mismatch {
                expected: self.expected(),
            };
        };

        match stem.split_once('/') {
            Some((variant, name)) if !variant.is_empty() && !name.is_empty() => {
                EntryClass::Member {
                    pair_id: stem.to_string(),
                    variant: variant.to_string(),
                    kind,
                }
            }
            _ => EntryClass::Mismatch {
                expected: self.expected(),
            },
        }
    }
}

/// Normalizes an archive entry path: `/` separators, no leading `./` or `/`
pub fn normalize_entry_path(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let mut path = unified.as_str();
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(pair_id: &str, variant: &str, kind: EntryKind) -> EntryClass {
        EntryClass::Member {
            pair_id: pair_id.into(),
            variant: variant.into(),
            kind,
        }
    }

    #[test]
    fn test_default_convention() {
        let convention = SuffixConvention::default();

        assert_eq!(
            convention.classify("dimension/district.grammar.csv"),
            member("dimension/district", "dimension", EntryKind::Grammar)
        );
        assert_eq!(
            convention.classify("event/attendance.data.csv"),
            member("event/attendance", "event", EntryKind::Data)
        );
    }

    #[test]
    fn test_nested_names_keep_full_pair_id() {
        let convention = SuffixConvention::default();
        assert_eq!(
            convention.classify("event/2024/attendance.data.csv"),
            member("event/2024/attendance", "event", EntryKind::Data)
        );
    }

    #[test]
    fn test_hidden_files_are_ignored() {
        let convention = SuffixConvention::default();
        assert_eq!(convention.classify("dimension/.DS_Store"), EntryClass::Ignored);
        assert_eq!(convention.classify("._district.grammar.csv"), EntryClass::Ignored);
    }

    #[test]
    fn test_mismatches() {
        let convention = SuffixConvention::default();

        // No variant directory
        assert!(matches!(
            convention.classify("district.grammar.csv"),
            EntryClass::Mismatch { .. }
        ));
        // Unknown suffix
        assert!(matches!(
            convention.classify("dimension/district.csv"),
            EntryClass::Mismatch { .. }
        ));
        // Suffix only
        assert!(matches!(
            convention.classify("dimension/.grammar.csv"),
            EntryClass::Ignored
        ));
        assert!(matches!(
            convention.classify("dimension/x/.data.csv"),
            EntryClass::Ignored
        ));
    }

    #[test]
    fn test_custom_suffixes() {
        let convention = SuffixConvention::new("_grammar.csv", "_data.csv");
        assert_eq!(
            convention.classify("event/sales_grammar.csv"),
            member("event/sales", "event", EntryKind::Grammar)
        );
    }

    #[test]
    fn test_overlapping_suffixes_prefer_longest() {
        let convention = SuffixConvention::new(".schema.csv", ".csv");
        assert_eq!(
            convention.classify("dimension/school.schema.csv"),
            member("dimension/school", "dimension", EntryKind::Grammar)
        );
        assert_eq!(
            convention.classify("dimension/school.csv"),
            member("dimension/school", "dimension", EntryKind::Data)
        );
    }

    #[test]
    fn test_normalize_entry_path() {
        assert_eq!(normalize_entry_path("./dimension/a.csv"), "dimension/a.csv");
        assert_eq!(normalize_entry_path("/event/b.csv"), "event/b.csv");
        assert_eq!(normalize_entry_path("event\\c.csv"), "event/c.csv");
    }
}
