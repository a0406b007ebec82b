use curricula_core::{Catalog, PrereqKind, PrerequisiteEdge};

use crate::selection::Selection;

/// Human-readable message for a violated edge.
pub fn violation_message(edge: &PrerequisiteEdge) -> String {
    match edge.kind {
        PrereqKind::Pre => format!(
            "{} requires {} before enrollment",
            edge.course, edge.required_course
        ),
        PrereqKind::Co => format!(
            "{} requires {} taken concurrently or in an earlier term",
            edge.course, edge.required_course
        ),
    }
}

/// Whether a single edge holds for the selection.
///
/// The required course must be selected. With a term-keyed selection its
/// term must also be strictly earlier (`Pre`) or no later (`Co`) than the
/// dependent course's term; a flat selection only checks presence.
pub fn edge_satisfied(edge: &PrerequisiteEdge, selection: &Selection) -> bool {
    let Some(required_term) = selection.term_of(&edge.required_course) else {
        return false;
    };
    if !selection.is_ordered() {
        return true;
    }
    let Some(course_term) = selection.term_of(&edge.course) else {
        return true;
    };

    match edge.kind {
        PrereqKind::Pre => required_term < course_term,
        PrereqKind::Co => required_term <= course_term,
    }
}

/// Messages for every violated edge of a selected course, in catalog order.
pub fn unmet_prerequisites(catalog: &Catalog, selection: &Selection) -> Vec<String> {
    catalog
        .prerequisites()
        .iter()
        .filter(|edge| selection.contains(&edge.course))
        .filter(|edge| !edge_satisfied(edge, selection))
        .map(violation_message)
        .collect()
}

/// Whether every prerequisite edge of `course` holds.
///
/// Vacuously true for a course without edges.
pub fn prerequisites_met(catalog: &Catalog, selection: &Selection, course: &str) -> bool {
    catalog
        .prerequisites_for(course)
        .all(|edge| edge_satisfied(edge, selection))
}

/// Selected courses whose own prerequisites are met, in selection order.
pub fn valid_selected(catalog: &Catalog, selection: &Selection) -> Vec<String> {
    selection
        .all_selected()
        .iter()
        .filter(|code| prerequisites_met(catalog, selection, code))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::RawSelection;
    use serde_json::json;

    fn catalog(edges: &[(&str, &str, PrereqKind)]) -> Catalog {
        Catalog::from_records(
            Vec::new(),
            edges
                .iter()
                .map(|(course, required, kind)| PrerequisiteEdge {
                    course: course.to_string(),
                    required_course: required.to_string(),
                    kind: *kind,
                })
                .collect(),
            Vec::new(),
            Vec::new(),
        )
    }

    fn selection(value: serde_json::Value) -> Selection {
        let raw: RawSelection = serde_json::from_value(value).expect("raw selection");
        Selection::from_raw(&raw)
    }

    #[test]
    fn pre_requires_strictly_earlier_term() {
        let catalog = catalog(&[("A", "B", PrereqKind::Pre)]);

        let ok = selection(json!({"Term 2": ["B"], "Term 3": ["A"]}));
        assert!(unmet_prerequisites(&catalog, &ok).is_empty());

        let same = selection(json!({"Term 3": ["A", "B"]}));
        assert_eq!(
            unmet_prerequisites(&catalog, &same),
            vec!["A requires B before enrollment".to_string()]
        );

        let later = selection(json!({"Term 4": ["B"], "Term 3": ["A"]}));
        assert_eq!(unmet_prerequisites(&catalog, &later).len(), 1);

        let missing = selection(json!({"Term 3": ["A"]}));
        assert_eq!(unmet_prerequisites(&catalog, &missing).len(), 1);
    }

    #[test]
    fn co_allows_same_term() {
        let catalog = catalog(&[("50.021", "50.007", PrereqKind::Co)]);

        let earlier = selection(json!({"Term 6": ["50.007"], "Term 8": ["50.021"]}));
        assert!(unmet_prerequisites(&catalog, &earlier).is_empty());

        let same = selection(json!({"Term 8": ["50.007", "50.021"]}));
        assert!(unmet_prerequisites(&catalog, &same).is_empty());

        let later = selection(json!({"Term 9": ["50.007"], "Term 8": ["50.021"]}));
        assert_eq!(
            unmet_prerequisites(&catalog, &later),
            vec!["50.021 requires 50.007 taken concurrently or in an earlier term".to_string()]
        );
    }

    #[test]
    fn flat_selection_checks_presence_only() {
        let catalog = catalog(&[("A", "B", PrereqKind::Pre), ("C", "D", PrereqKind::Co)]);

        let present = selection(json!(["A", "B", "C", "D"]));
        assert!(unmet_prerequisites(&catalog, &present).is_empty());

        let absent = selection(json!(["A", "C"]));
        assert_eq!(unmet_prerequisites(&catalog, &absent).len(), 2);
    }

    #[test]
    fn edges_of_unselected_courses_are_ignored() {
        let catalog = catalog(&[("A", "B", PrereqKind::Pre)]);
        let selection = selection(json!({"Term 1": ["C"]}));
        assert!(unmet_prerequisites(&catalog, &selection).is_empty());
    }

    #[test]
    fn courses_without_edges_are_always_met() {
        let catalog = catalog(&[("A", "B", PrereqKind::Pre)]);
        for value in [json!([]), json!(["A"]), json!({"Term 1": ["Z"]})] {
            let selection = selection(value);
            assert!(prerequisites_met(&catalog, &selection, "Z"));
            assert!(prerequisites_met(&catalog, &selection, "B"));
        }
    }

    #[test]
    fn valid_selected_is_a_filtered_subset() {
        let catalog = catalog(&[
            ("A", "B", PrereqKind::Pre),
            ("A", "C", PrereqKind::Co),
            ("D", "E", PrereqKind::Pre),
        ]);
        let selection = selection(json!({
            "Term 1": ["B"],
            "Term 2": ["A", "C", "D"],
        }));

        assert_eq!(valid_selected(&catalog, &selection), ["B", "A", "C"]);
        for code in valid_selected(&catalog, &selection) {
            assert!(selection.all_selected().contains(&code));
        }
    }
}
