//! Canonical forms for course codes and free-text identifiers.
//!
//! Every lookup in the catalog and every comparison against a selection goes
//! through these helpers, so `" 50.007 "`, `"50. 007"` and `"50.007"` all refer
//! to the same course.

/// Placeholder used by curriculum sheets for "no courses".
pub const NONE_SENTINEL: &str = "-";

/// Canonicalize a course code: trim, strip all whitespace, upper-case.
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Canonicalize a free-text label such as a pillar, tag or group name.
///
/// Unlike [`normalize_code`] this keeps word boundaries: runs of whitespace
/// collapse to a single space.
pub fn normalize_label(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Input accepted by [`normalize_list`].
#[derive(Debug, Clone, Copy)]
pub enum CodeList<'a> {
    /// A comma-delimited cell such as `"50.001, 50.002"`.
    Delimited(&'a str),
    /// An already split sequence of codes.
    Items(&'a [String]),
}

impl<'a> From<&'a str> for CodeList<'a> {
    fn from(value: &'a str) -> Self {
        CodeList::Delimited(value)
    }
}

impl<'a> From<&'a [String]> for CodeList<'a> {
    fn from(value: &'a [String]) -> Self {
        CodeList::Items(value)
    }
}

/// Canonicalize a list of codes, dropping blanks and the `"-"` sentinel.
///
/// The result keeps first-appearance order and contains no duplicates.
pub fn normalize_list<'a>(raw: impl Into<CodeList<'a>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |item: &str| {
        let code = normalize_code(item);
        if code.is_empty() || code == NONE_SENTINEL || out.contains(&code) {
            return;
        }
        out.push(code);
    };

    match raw.into() {
        CodeList::Delimited(text) => text.split(',').for_each(&mut push),
        CodeList::Items(items) => items.iter().for_each(|item| push(item)),
    }

    out
}

/// Parse the leading integer of a cell (`"12"`, `" 12 "`, `"12.0"` all give 12).
///
/// Returns `None` for blank or non-numeric cells; callers default to zero.
pub fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// The last run of ASCII digits embedded in a term label (`"Term 10"` → 10).
pub fn last_embedded_number(label: &str) -> Option<u32> {
    let mut last = None;
    let mut current = String::new();
    for ch in label.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            last = current.parse().ok().or(last);
            current.clear();
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_strips_all_whitespace_and_uppercases() {
        assert_eq!(normalize_code("  50. 007\t"), "50.007");
        assert_eq!(normalize_code("cs 101"), "CS101");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn label_collapses_whitespace() {
        assert_eq!(normalize_label("  istd "), "ISTD");
        assert_eq!(normalize_label("Artificial   Intelligence"), "ARTIFICIAL INTELLIGENCE");
    }

    #[test]
    fn list_drops_blanks_sentinel_and_duplicates() {
        assert_eq!(
            normalize_list("50.001, ,-, 50.002,50.001"),
            vec!["50.001".to_string(), "50.002".to_string()]
        );
        assert!(normalize_list("-").is_empty());
        assert!(normalize_list("").is_empty());

        let items = vec![" cs101".to_string(), String::new(), "CS101".to_string()];
        assert_eq!(normalize_list(items.as_slice()), vec!["CS101".to_string()]);
    }

    #[test]
    fn count_reads_leading_integer() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count(" 12.0 "), Some(12));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("twelve"), None);
    }

    #[test]
    fn term_number_uses_last_digit_run() {
        assert_eq!(last_embedded_number("Term 8"), Some(8));
        assert_eq!(last_embedded_number("Year 2 Term 10"), Some(10));
        assert_eq!(last_embedded_number("7"), Some(7));
        assert_eq!(last_embedded_number("Summer"), None);
    }
}
