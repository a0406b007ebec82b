use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::normalize::normalize_label;

/// Pillar tag for the information systems track pillar.
pub const PILLAR_ISTD: &str = "ISTD";
/// Pillar tag for humanities, arts and social sciences.
pub const PILLAR_HASS: &str = "HASS";

/// Whether a course is part of the core curriculum or an elective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Core,
    Elective,
    /// Blank or unrecognized in the source sheet.
    Unspecified,
}

/// Case-insensitive; a blank cell is [`CourseType::Unspecified`].
impl FromStr for CourseType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_label(raw).as_str() {
            "CORE" => Ok(CourseType::Core),
            "ELECTIVE" => Ok(CourseType::Elective),
            "" => Ok(CourseType::Unspecified),
            _ => Err(Error::UnknownValue {
                kind: "course type",
                value: raw.trim().to_string(),
            }),
        }
    }
}

/// A course in the reference catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Canonical course code.
    pub code: String,
    pub name: String,
    pub credits: u32,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    /// Free text as maintained in the sheet (usually a term number).
    pub term_offered: String,
    /// Canonical pillar label, e.g. `ISTD` or `HASS`.
    pub pillar: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub track_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub minor_tags: Vec<String>,
}

impl Course {
    pub fn is_elective(&self) -> bool {
        self.course_type == CourseType::Elective
    }

    pub fn is_core(&self) -> bool {
        self.course_type == CourseType::Core
    }

    pub fn has_pillar(&self, pillar: &str) -> bool {
        self.pillar == pillar
    }
}

/// Ordering semantics of a prerequisite edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrereqKind {
    /// The required course must sit in a strictly earlier term.
    Pre,
    /// The required course may sit in the same term or earlier.
    Co,
}

impl FromStr for PrereqKind {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_label(raw).as_str() {
            "PRE" => Ok(PrereqKind::Pre),
            "CO" => Ok(PrereqKind::Co),
            _ => Err(Error::UnknownValue {
                kind: "prerequisite kind",
                value: raw.trim().to_string(),
            }),
        }
    }
}

/// Directed relation `course` requires `required_course`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteEdge {
    pub course: String,
    pub required_course: String,
    pub kind: PrereqKind,
}

/// One requirement row (group) of a track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequirement {
    pub track_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub choice_group: String,
    pub required_courses: Vec<String>,
    pub min_courses_needed: u32,
    /// Explicit elective course codes.
    pub elective_pool: Vec<String>,
    /// Pillar tags whose electives also count toward the pool.
    pub elective_pool_pillars: Vec<String>,
    pub elective_min: u32,
}

/// One requirement row (group) of a minor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MinorRequirement {
    pub minor_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub choice_group: String,
    pub mandatory_courses: Vec<String>,
    pub choice_courses: Vec<String>,
    pub choice_min: u32,
}
