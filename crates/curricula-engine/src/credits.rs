use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use curricula_core::{Catalog, Course, CourseType, PILLAR_HASS, PILLAR_ISTD};

/// Minimum credits for each bucket's `*Met` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "snake_case")]
pub struct CreditThresholds {
    pub hass: u32,
    pub elective: u32,
    pub core: u32,
    pub all_elective: u32,
}

impl Default for CreditThresholds {
    fn default() -> Self {
        Self {
            hass: 60,
            elective: 60,
            core: 60,
            all_elective: 96,
        }
    }
}

/// The bucket a course's credits land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditBucket {
    Hass,
    /// ISTD elective; also counted in the all-elective total.
    IstdElective,
    /// Elective of any other pillar.
    OtherElective,
    IstdCore,
}

/// Classify a course by priority: HASS pillar first, then electives, then
/// ISTD core. `None` for courses that feed no bucket.
pub fn classify(course: &Course) -> Option<CreditBucket> {
    if course.has_pillar(PILLAR_HASS) {
        return Some(CreditBucket::Hass);
    }
    match course.course_type {
        CourseType::Elective if course.has_pillar(PILLAR_ISTD) => Some(CreditBucket::IstdElective),
        CourseType::Elective => Some(CreditBucket::OtherElective),
        CourseType::Core if course.has_pillar(PILLAR_ISTD) => Some(CreditBucket::IstdCore),
        _ => None,
    }
}

/// Per-bucket credit sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreditTotals {
    pub hass: u32,
    pub elective: u32,
    pub all_elective: u32,
    pub core: u32,
}

impl CreditTotals {
    /// Sums saturate at `u32::MAX`; catalog credit cells are unbounded.
    fn add(&mut self, bucket: CreditBucket, credits: u32) {
        match bucket {
            CreditBucket::Hass => self.hass = self.hass.saturating_add(credits),
            CreditBucket::IstdElective => {
                self.elective = self.elective.saturating_add(credits);
                self.all_elective = self.all_elective.saturating_add(credits);
            }
            CreditBucket::OtherElective => {
                self.all_elective = self.all_elective.saturating_add(credits)
            }
            CreditBucket::IstdCore => self.core = self.core.saturating_add(credits),
        }
    }

    /// Compare the totals against thresholds.
    pub fn status(&self, thresholds: &CreditThresholds) -> CreditStatus {
        CreditStatus {
            hass_met: self.hass >= thresholds.hass,
            hass_credits: self.hass,
            elective_met: self.elective >= thresholds.elective,
            elective_credits: self.elective,
            core_met: self.core >= thresholds.core,
            core_credits: self.core,
            all_elective_credits_met: self.all_elective >= thresholds.all_elective,
            all_elective_credits: self.all_elective,
        }
    }
}

/// Credit totals and threshold flags as they appear in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditStatus {
    pub hass_met: bool,
    pub hass_credits: u32,
    pub elective_met: bool,
    pub elective_credits: u32,
    pub core_met: bool,
    pub core_credits: u32,
    pub all_elective_credits_met: bool,
    pub all_elective_credits: u32,
}

/// Sum the credits of `valid` courses into buckets.
///
/// Duplicate codes are counted once; codes unknown to the catalog count
/// nothing.
pub fn aggregate_credits(catalog: &Catalog, valid: &[String]) -> CreditTotals {
    let mut totals = CreditTotals::default();
    let mut seen: Vec<&str> = Vec::with_capacity(valid.len());
    for code in valid {
        if seen.contains(&code.as_str()) {
            continue;
        }
        seen.push(code);
        let Some(course) = catalog.course(code) else {
            continue;
        };
        if let Some(bucket) = classify(course) {
            totals.add(bucket, course.credits);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, credits: u32, course_type: CourseType, pillar: &str) -> Course {
        Course {
            code: code.to_string(),
            name: String::new(),
            credits,
            course_type,
            term_offered: String::new(),
            pillar: pillar.to_string(),
            track_tags: Vec::new(),
            minor_tags: Vec::new(),
        }
    }

    fn codes(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn classification_follows_priority() {
        let hass_elective = course("02.1", 12, CourseType::Elective, "HASS");
        assert_eq!(classify(&hass_elective), Some(CreditBucket::Hass));
        let istd_elective = course("50.1", 12, CourseType::Elective, "ISTD");
        assert_eq!(classify(&istd_elective), Some(CreditBucket::IstdElective));
        let esd_elective = course("40.1", 12, CourseType::Elective, "ESD");
        assert_eq!(classify(&esd_elective), Some(CreditBucket::OtherElective));
        let istd_core = course("50.2", 12, CourseType::Core, "ISTD");
        assert_eq!(classify(&istd_core), Some(CreditBucket::IstdCore));
        let esd_core = course("40.2", 12, CourseType::Core, "ESD");
        assert_eq!(classify(&esd_core), None);
        let untyped = course("50.3", 12, CourseType::Unspecified, "ISTD");
        assert_eq!(classify(&untyped), None);
    }

    #[test]
    fn hass_threshold_is_inclusive() {
        let courses: Vec<Course> = (1..=5)
            .map(|n| course(&format!("02.10{n}"), 12, CourseType::Elective, "HASS"))
            .collect();
        let catalog = Catalog::from_records(courses, Vec::new(), Vec::new(), Vec::new());
        let thresholds = CreditThresholds::default();

        let all = codes(&["02.101", "02.102", "02.103", "02.104", "02.105"]);
        let status = aggregate_credits(&catalog, &all).status(&thresholds);
        assert_eq!(status.hass_credits, 60);
        assert!(status.hass_met);
        assert_eq!(status.all_elective_credits, 0);

        let four = codes(&["02.101", "02.102", "02.103", "02.104"]);
        let status = aggregate_credits(&catalog, &four).status(&thresholds);
        assert_eq!(status.hass_credits, 48);
        assert!(!status.hass_met);
    }

    #[test]
    fn istd_electives_count_twice_and_duplicates_once() {
        let catalog = Catalog::from_records(
            vec![
                course("50.035", 12, CourseType::Elective, "ISTD"),
                course("40.012", 12, CourseType::Elective, "ESD"),
                course("50.001", 12, CourseType::Core, "ISTD"),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let valid = codes(&["50.035", "50.035", "40.012", "50.001", "99.999"]);
        let totals = aggregate_credits(&catalog, &valid);
        assert_eq!(
            totals,
            CreditTotals {
                hass: 0,
                elective: 12,
                all_elective: 24,
                core: 12,
            }
        );
    }

    #[test]
    fn oversized_credit_cells_saturate_instead_of_overflowing() {
        let catalog = Catalog::from_records(
            vec![
                course("02.101", 4_000_000_000, CourseType::Elective, "HASS"),
                course("02.102", 4_000_000_000, CourseType::Elective, "HASS"),
                course("50.035", u32::MAX, CourseType::Elective, "ISTD"),
                course("40.012", 1, CourseType::Elective, "ESD"),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let valid = codes(&["02.101", "02.102", "50.035", "40.012"]);
        let status = aggregate_credits(&catalog, &valid).status(&CreditThresholds::default());
        assert_eq!(status.hass_credits, u32::MAX);
        assert!(status.hass_met);
        assert_eq!(status.elective_credits, u32::MAX);
        assert_eq!(status.all_elective_credits, u32::MAX);
        assert_eq!(status.core_credits, 0);
    }
}
