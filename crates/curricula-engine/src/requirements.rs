//! Track and minor fulfillment.
//!
//! Both kinds of requirement are stored one row per group. Rows are grouped
//! by canonical name and a track or minor is fulfilled only when every one of
//! its groups is. Choice and elective counts are taken over the
//! prerequisite-valid selection, so a course with unmet prerequisites never
//! counts toward a requirement.

use std::collections::HashSet;

use curricula_core::{Catalog, MinorRequirement, PILLAR_ISTD, TrackRequirement, normalize_label};

use crate::selection::Selection;

/// Set of canonical codes used for membership counts.
pub type CodeSet<'a> = HashSet<&'a str>;

/// Build a [`CodeSet`] over canonical codes.
pub fn code_set(codes: &[String]) -> CodeSet<'_> {
    codes.iter().map(String::as_str).collect()
}

fn count_in<'a>(codes: impl IntoIterator<Item = &'a String>, set: &CodeSet<'_>) -> u32 {
    codes
        .into_iter()
        .filter(|code| set.contains(code.as_str()))
        .count() as u32
}

/// Explicit pool codes plus, when the pool lists the ISTD pillar, every ISTD
/// elective in the catalog.
pub fn elective_pool<'a>(group: &'a TrackRequirement, catalog: &'a Catalog) -> Vec<&'a String> {
    let mut pool: Vec<&String> = group.elective_pool.iter().collect();
    if group
        .elective_pool_pillars
        .iter()
        .any(|pillar| pillar == PILLAR_ISTD)
    {
        for course in catalog.courses() {
            let in_pillar = course.is_elective() && course.has_pillar(PILLAR_ISTD);
            if in_pillar && !pool.contains(&&course.code) {
                pool.push(&course.code);
            }
        }
    }
    pool
}

/// Whether one track group is met by the valid selection.
pub fn track_group_fulfilled(
    group: &TrackRequirement,
    catalog: &Catalog,
    valid: &CodeSet<'_>,
) -> bool {
    let required = count_in(&group.required_courses, valid);
    let electives = count_in(elective_pool(group, catalog), valid);
    required >= group.min_courses_needed && electives >= group.elective_min
}

/// Names of fulfilled tracks, in first-appearance order.
pub fn fulfilled_tracks(catalog: &Catalog, valid: &CodeSet<'_>) -> Vec<String> {
    group_by_name(catalog.tracks(), |row| &row.track_name)
        .into_iter()
        .filter(|(_, groups)| {
            groups
                .iter()
                .all(|group| track_group_fulfilled(group, catalog, valid))
        })
        .map(|(name, _)| name)
        .collect()
}

/// Whether one minor group's choice threshold is met by the valid selection.
///
/// Groups with an empty choice pool pass.
pub fn minor_group_choices_met(group: &MinorRequirement, valid: &CodeSet<'_>) -> bool {
    group.choice_courses.is_empty() || count_in(&group.choice_courses, valid) >= group.choice_min
}

/// Names of fulfilled minors, in first-appearance order.
///
/// Mandatory courses are checked against the raw selection: presence, not
/// prerequisite validity, is the gate for them.
pub fn fulfilled_minors(catalog: &Catalog, raw: &Selection, valid: &CodeSet<'_>) -> Vec<String> {
    group_by_name(catalog.minors(), |row| &row.minor_name)
        .into_iter()
        .filter(|(_, groups)| {
            let mandatory_met = groups
                .iter()
                .flat_map(|group| &group.mandatory_courses)
                .all(|code| raw.contains(code));
            mandatory_met
                && groups
                    .iter()
                    .all(|group| minor_group_choices_met(group, valid))
        })
        .map(|(name, _)| name)
        .collect()
}

/// Group requirement rows by canonical name, keeping the first display name
/// and first-appearance order. Rows with a blank name are skipped.
fn group_by_name<'a, T>(
    rows: &'a [T],
    name_of: impl Fn(&'a T) -> &'a String,
) -> Vec<(String, Vec<&'a T>)> {
    let mut groups: Vec<(String, String, Vec<&'a T>)> = Vec::new();
    for row in rows {
        let display = name_of(row).trim();
        let key = normalize_label(display);
        if key.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(existing, _, _)| *existing == key) {
            Some((_, _, members)) => members.push(row),
            None => groups.push((key, display.to_string(), vec![row])),
        }
    }
    groups
        .into_iter()
        .map(|(_, display, members)| (display, members))
        .collect()
}
