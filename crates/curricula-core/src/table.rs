use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw tabular data as returned by a reference data provider.
///
/// The first row of the provider's range is the header; every other row is
/// data. Rows may be shorter than the header (trailing blank cells are often
/// omitted by spreadsheet exports).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Build a table from a header row followed by data rows.
    ///
    /// An empty input yields an empty table.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows.remove(0);
        Self { header, rows }
    }

    /// Case-insensitive, trimmed header lookup.
    pub fn columns(&self) -> ColumnIndex {
        ColumnIndex::new(&self.header)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header name to position map used to read typed fields from rows.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(header: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            positions
                .entry(header_key(name))
                .or_insert(idx);
        }
        Self { positions }
    }

    /// Position of the first alias present in the header.
    pub fn position(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.positions.get(&header_key(alias)).copied())
    }

    pub fn has(&self, aliases: &[&str]) -> bool {
        self.position(aliases).is_some()
    }

    /// Read a cell by alias, defaulting to the empty string when the column
    /// or the cell is missing.
    pub fn cell<'r>(&self, row: &'r [String], aliases: &[&str]) -> &'r str {
        self.position(aliases)
            .and_then(|idx| row.get(idx))
            .map(|cell| cell.trim())
            .unwrap_or_default()
    }
}

fn header_key(name: &str) -> String {
    name.trim().to_lowercase()
}
