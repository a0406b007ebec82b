//! Normalization of the caller's course selection.
//!
//! The selection payload changed shape several times without a version field:
//! a flat list of codes, then `{code, passed}` records, then per-term
//! `{header, courses}` blocks. [`RawSelection`] accepts all of them and
//! [`Selection::from_raw`] turns any of them into one canonical structure
//! before a single rule looks at it.

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use curricula_core::normalize::{last_embedded_number, normalize_code, normalize_list};

/// Sort position for term labels without any digits.
pub const UNNUMBERED_TERM_SORT_KEY: u32 = 9999;

/// Selection payload as received at the request boundary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawSelection {
    /// A flat list; term ordering cannot be enforced.
    Flat(Vec<CourseEntry>),
    /// Term label to the courses taken in that term.
    Terms(BTreeMap<String, TermEntry>),
    /// A comma-delimited string of codes.
    Delimited(String),
    /// Anything else; read as an empty flat selection.
    Other(Value),
}

impl Default for RawSelection {
    fn default() -> Self {
        RawSelection::Flat(Vec::new())
    }
}

/// The courses of one term.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TermEntry {
    Codes(Vec<CourseEntry>),
    Block {
        #[serde(default)]
        header: Option<String>,
        #[serde(default)]
        courses: Vec<CourseEntry>,
    },
    Delimited(String),
    Other(Value),
}

/// One course in a term or flat list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CourseEntry {
    Code(String),
    Record {
        code: String,
        #[serde(default)]
        passed: Option<bool>,
    },
    Other(Value),
}

impl CourseEntry {
    /// The entry's code when it counts as selected.
    ///
    /// Records count only when `passed` is `true`. Inside a `{header, courses}`
    /// block only such records count; bare codes there are ignored.
    fn active_code(&self, in_block: bool) -> Option<&str> {
        match self {
            CourseEntry::Code(code) if !in_block => Some(code),
            CourseEntry::Record {
                code,
                passed: Some(true),
            } => Some(code),
            _ => None,
        }
    }
}

/// One term of a normalized selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTerm {
    pub label: String,
    /// Term number used for ordering checks.
    pub ordinal: u32,
    pub header: Option<String>,
    /// Canonical codes active in this term.
    pub courses: Vec<String>,
}

/// Canonical, term-indexed selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    terms: Vec<SelectedTerm>,
    all_selected: Vec<String>,
    course_to_term: HashMap<String, u32>,
    ordered: bool,
}

impl Selection {
    /// Normalize any boundary shape.
    pub fn from_raw(raw: &RawSelection) -> Self {
        match raw {
            RawSelection::Flat(entries) => Self::flat(active_codes(entries, false)),
            RawSelection::Terms(terms) => Self::from_terms(terms),
            RawSelection::Delimited(text) => Self::flat(normalize_list(text.as_str())),
            RawSelection::Other(value) => {
                if !value.is_null() {
                    tracing::debug!(event = "selection_shape_unrecognized", kind = value_kind(value));
                }
                Self::flat(Vec::new())
            }
        }
    }

    /// Flat selection from plain codes.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: Vec<String> = codes
            .into_iter()
            .map(|code| code.as_ref().to_string())
            .collect();
        Self::flat(normalize_list(codes.as_slice()))
    }

    fn flat(codes: Vec<String>) -> Self {
        let course_to_term = codes.iter().map(|code| (code.clone(), 0)).collect();
        Self {
            terms: vec![SelectedTerm {
                label: String::new(),
                ordinal: 0,
                header: None,
                courses: codes.clone(),
            }],
            all_selected: codes,
            course_to_term,
            ordered: false,
        }
    }

    fn from_terms(raw_terms: &BTreeMap<String, TermEntry>) -> Self {
        let mut labels: Vec<&String> = raw_terms.keys().collect();
        labels.sort_by(|a, b| term_sort_key(a).cmp(&term_sort_key(b)));

        let mut selection = Self {
            ordered: true,
            ..Self::default()
        };

        for label in labels {
            let (header, courses) = match &raw_terms[label] {
                TermEntry::Codes(entries) => (None, active_codes(entries, false)),
                TermEntry::Block { header, courses } => {
                    (header.clone(), active_codes(courses, true))
                }
                TermEntry::Delimited(text) => (None, normalize_list(text.as_str())),
                TermEntry::Other(_) => (None, Vec::new()),
            };

            let ordinal = last_embedded_number(label).unwrap_or(0);
            for code in &courses {
                if !selection.course_to_term.contains_key(code) {
                    selection.course_to_term.insert(code.clone(), ordinal);
                    selection.all_selected.push(code.clone());
                }
            }

            selection.terms.push(SelectedTerm {
                label: label.clone(),
                ordinal,
                header,
                courses,
            });
        }

        selection
    }

    /// Whether cross-term ordering can be enforced.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn terms(&self) -> &[SelectedTerm] {
        &self.terms
    }

    /// Every selected canonical code, in first-appearance order.
    pub fn all_selected(&self) -> &[String] {
        &self.all_selected
    }

    pub fn contains(&self, code: &str) -> bool {
        self.course_to_term.contains_key(code)
    }

    /// Term ordinal of a selected course. A repeated course keeps the ordinal
    /// of the first term in sort order, so an unnumbered term never wins over
    /// a numbered one.
    pub fn term_of(&self, code: &str) -> Option<u32> {
        self.course_to_term.get(code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.all_selected.is_empty()
    }
}

fn term_sort_key(label: &str) -> (u32, &str) {
    (
        last_embedded_number(label).unwrap_or(UNNUMBERED_TERM_SORT_KEY),
        label,
    )
}

fn active_codes(entries: &[CourseEntry], in_block: bool) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for entry in entries {
        let Some(raw) = entry.active_code(in_block) else {
            continue;
        };
        let code = normalize_code(raw);
        if !code.is_empty() && code != "-" && !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Selection {
        let raw: RawSelection = serde_json::from_value(value).expect("raw selection");
        Selection::from_raw(&raw)
    }

    #[test]
    fn flat_list_is_unordered_at_term_zero() {
        let selection = parse(json!([" cs101", "MA102", "cs101"]));
        assert!(!selection.is_ordered());
        assert_eq!(selection.all_selected(), ["CS101", "MA102"]);
        assert_eq!(selection.term_of("MA102"), Some(0));
    }

    #[test]
    fn terms_sort_by_last_number_with_unnumbered_last() {
        let selection = parse(json!({
            "Term 10": ["50.021"],
            "Summer": ["99.001"],
            "Term 2": ["50.001"],
            "Year 1 Term 3": ["50.002"],
        }));

        let labels: Vec<&str> = selection.terms().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Term 2", "Year 1 Term 3", "Term 10", "Summer"]);
        assert_eq!(selection.all_selected(), ["50.001", "50.002", "50.021", "99.001"]);
        assert_eq!(selection.term_of("50.002"), Some(3));
        assert_eq!(selection.term_of("99.001"), Some(0));
        assert!(selection.is_ordered());
    }

    #[test]
    fn block_shape_keeps_only_passed_courses() {
        let selection = parse(json!({
            "Term 4": {
                "header": "Term 4 (Fall)",
                "courses": [
                    {"code": "50.001", "passed": true},
                    {"code": "50.002", "passed": false},
                    {"code": "50.003"},
                    "50.004"
                ]
            }
        }));

        assert_eq!(selection.all_selected(), ["50.001"]);
        assert_eq!(selection.terms()[0].header.as_deref(), Some("Term 4 (Fall)"));
    }

    #[test]
    fn records_in_plain_lists_need_passed_true() {
        let selection = parse(json!({
            "1": [{"code": "a1", "passed": true}, {"code": "a2", "passed": false}, "a3"]
        }));
        assert_eq!(selection.all_selected(), ["A1", "A3"]);
        assert_eq!(selection.term_of("A3"), Some(1));
    }

    #[test]
    fn repeated_course_maps_to_earliest_term() {
        let selection = parse(json!({
            "Term 5": ["50.001"],
            "Term 2": ["50.001"],
        }));
        assert_eq!(selection.term_of("50.001"), Some(2));
        assert_eq!(selection.all_selected().len(), 1);
    }

    #[test]
    fn unnumbered_term_does_not_override_numbered_one() {
        let selection = parse(json!({
            "Summer": ["50.001"],
            "Term 5": ["50.001"],
        }));
        assert_eq!(selection.term_of("50.001"), Some(5));
        assert_eq!(selection.all_selected(), ["50.001"]);
    }

    #[test]
    fn equal_ordinals_break_ties_on_label() {
        let selection = parse(json!({
            "Year 1 Term 3": ["50.002", "50.001"],
            "Term 3": ["50.001"],
        }));

        let labels: Vec<&str> = selection.terms().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Term 3", "Year 1 Term 3"]);
        assert_eq!(selection.all_selected(), ["50.001", "50.002"]);
        assert_eq!(selection.term_of("50.001"), Some(3));
        assert_eq!(selection.term_of("50.002"), Some(3));
    }

    #[test]
    fn unrecognized_shapes_fall_back_to_flat() {
        assert!(parse(json!(42)).is_empty());
        assert!(!parse(json!(null)).is_ordered());
        assert_eq!(parse(json!("cs101, ma102")).all_selected(), ["CS101", "MA102"]);

        let selection = parse(json!([1, {"unexpected": true}, "cs101"]));
        assert_eq!(selection.all_selected(), ["CS101"]);
    }

    #[test]
    fn malformed_term_values_are_empty_terms() {
        let selection = parse(json!({"Term 1": 5, "Term 2": "50.001,50.002"}));
        assert!(selection.is_ordered());
        assert_eq!(selection.terms()[0].courses.len(), 0);
        assert_eq!(selection.all_selected(), ["50.001", "50.002"]);
    }
}
