//! Grammar text parser
//!
//! A grammar document is comma-separated text whose first three non-empty
//! lines are the role line, the type line and the name line. Any further
//! lines are data rows supplied together with the grammar.
//!
//! Parsing never fails. Missing metadata lines become empty cell sequences
//! and surface later as column-count or type findings.

use super::types::Line;

/// Number of metadata lines at the top of every grammar
pub const METADATA_LINES: usize = 3;

/// A grammar split into its metadata lines and trailing rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarDocument {
    pub role_line: Line,
    pub type_line: Line,
    pub name_line: Line,
    /// Non-empty lines after the metadata, in source order
    pub data_lines: Vec<Line>,
}

impl GrammarDocument {
    /// The three metadata lines, present or missing, then the data lines
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        [&self.role_line, &self.type_line, &self.name_line]
            .into_iter()
            .chain(self.data_lines.iter())
    }

    /// Cell count every line must match
    pub fn expected_columns(&self) -> usize {
        self.role_line.len()
    }
}

/// Splits raw grammar text into a `GrammarDocument`
pub struct GrammarParser;

impl GrammarParser {
    /// Parses grammar text.
    ///
    /// Line numbers are 1-based positions in the trimmed text; blank lines
    /// are skipped without renumbering the lines that follow.
    pub fn parse(content: &str) -> GrammarDocument {
        let mut lines = split_lines(content, true).into_iter();

        let role_line = lines.next().unwrap_or_else(|| Line::empty(1));
        let type_line = lines.next().unwrap_or_else(|| Line::empty(2));
        let name_line = lines.next().unwrap_or_else(|| Line::empty(3));

        GrammarDocument {
            role_line,
            type_line,
            name_line,
            data_lines: lines.collect(),
        }
    }
}

/// Splits data-file text into rows. Cells are kept verbatim.
pub fn parse_data_rows(content: &str) -> Vec<Line> {
    split_lines(content, false)
}

/// Splits text into non-empty, numbered lines of comma-separated cells.
fn split_lines(content: &str, trim_cells: bool) -> Vec<Line> {
    content
        .trim()
        .split('\n')
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = raw.trim_end_matches('\r').trim();
            if line.is_empty() {
                return None;
            }
            let cells = line
                .split(',')
                .map(|cell| {
                    if trim_cells {
                        cell.trim().to_string()
                    } else {
                        cell.to_string()
                    }
                })
                .collect();
            Some(Line::new(i + 1, cells))
        })
        .collect()
}
