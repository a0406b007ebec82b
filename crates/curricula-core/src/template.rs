use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::table::RawTable;

/// One suggested-plan row, keyed by the range's header names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateRow {
    /// Zero-based position among the data rows.
    pub id: usize,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl TemplateRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }
}

/// Header-mapped view of the term template range.
///
/// Blank header cells are skipped and a column literally named `id` is
/// ignored so it cannot clash with the row id. Short rows are padded with
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TermTemplate {
    rows: Vec<TemplateRow>,
}

impl TermTemplate {
    pub fn from_table(table: &RawTable) -> Self {
        let headers: Vec<(usize, &str)> = table
            .header
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx, name.trim()))
            .filter(|(_, name)| !name.is_empty() && !name.eq_ignore_ascii_case("id"))
            .collect();

        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(id, row)| TemplateRow {
                id,
                fields: headers
                    .iter()
                    .map(|(idx, name)| {
                        let cell = row.get(*idx).map(|cell| cell.trim()).unwrap_or_default();
                        (name.to_string(), cell.to_string())
                    })
                    .collect(),
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[TemplateRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn rows_are_keyed_by_header_with_positional_ids() {
        let table = RawTable::from_rows(vec![
            strings(&["Term", " Course 1 ", "", "Course 2"]),
            strings(&["Term 1", "10.013", "ignored", "10.014"]),
            strings(&["Term 2", " 10.015"]),
        ]);

        let template = TermTemplate::from_table(&table);
        assert_eq!(template.rows().len(), 2);

        let second = &template.rows()[1];
        assert_eq!(second.id, 1);
        assert_eq!(second.get("Term"), Some("Term 2"));
        assert_eq!(second.get("Course 1"), Some("10.015"));
        assert_eq!(second.get("Course 2"), Some(""));
        assert_eq!(second.fields.len(), 3);
    }

    #[test]
    fn serializes_as_flat_objects_and_ignores_id_column() {
        let table = RawTable::from_rows(vec![
            strings(&["id", "Term", "Course 1"]),
            strings(&["7", "Term 3", "50.001"]),
        ]);

        let json = serde_json::to_value(TermTemplate::from_table(&table)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([{ "id": 0, "Term": "Term 3", "Course 1": "50.001" }])
        );
    }

    #[test]
    fn empty_table_is_empty_template() {
        assert!(TermTemplate::from_table(&RawTable::default()).is_empty());
    }
}
