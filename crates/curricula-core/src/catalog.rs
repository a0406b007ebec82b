use std::collections::{BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    Course, CourseType, MinorRequirement, PrereqKind, PrerequisiteEdge, TrackRequirement,
};
use crate::normalize::{normalize_code, normalize_label, normalize_list, parse_count};
use crate::table::{ColumnIndex, RawTable};

const COURSE_CODE: &[&str] = &["course_code", "code"];
const COURSE_NAME: &[&str] = &["course_name", "name"];
const CREDITS: &[&str] = &["credits"];
const COURSE_TYPE: &[&str] = &["type", "course_type"];
const TERM_OFFERED: &[&str] = &["term_offered"];
const PILLAR: &[&str] = &["pillar"];
const TRACK_TAGS: &[&str] = &["track_tags"];
const MINOR_TAGS: &[&str] = &["minor_tags"];

const PREREQ_COURSE: &[&str] = &["course_code", "course"];
const PREREQ_REQUIRED: &[&str] = &["prereq_code", "required_course"];
const PREREQ_KIND: &[&str] = &["prereq_type", "type"];

const TRACK_NAME: &[&str] = &["track_name"];
const REQUIRED_COURSES: &[&str] = &["required_courses"];
const CHOICE_GROUP: &[&str] = &["choice_group"];
const MIN_COURSES_NEEDED: &[&str] = &["min_courses_needed"];
const ELECTIVE_POOL_CODES: &[&str] = &["elective_pool_codes"];
const ELECTIVE_POOL_PILLARS: &[&str] = &["elective_pool_pillars"];
const ELECTIVE_MIN: &[&str] = &["elective_min"];

const MINOR_NAME: &[&str] = &["minor_name"];
const MANDATORY_COURSES: &[&str] = &["mandatory_courses"];
const CHOICE_COURSES: &[&str] = &["choice_courses"];
const CHOICE_MIN: &[&str] = &["choice_min"];

/// Row-level problem found while mapping raw tables into typed records.
///
/// Parsing is tolerant: the offending field is defaulted (or, for an
/// unevaluable prerequisite, the row is skipped) and a warning is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogWarning {
    pub code: String,
    /// Record set the warning belongs to (`courses`, `prerequisites`, ...).
    pub range: String,
    /// 1-based data row, when the warning concerns a single row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub message: String,
}

impl CatalogWarning {
    fn new(
        code: impl Into<String>,
        range: &str,
        row: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            range: range.to_string(),
            row,
            message: message.into(),
        }
    }
}

/// Immutable typed view over the four reference record sets.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    course_index: HashMap<String, usize>,
    prerequisites: Vec<PrerequisiteEdge>,
    tracks: Vec<TrackRequirement>,
    minors: Vec<MinorRequirement>,
    warnings: Vec<CatalogWarning>,
}

impl Catalog {
    /// Map raw provider tables into typed records.
    ///
    /// Never fails: malformed rows default their fields and surface as
    /// [`CatalogWarning`]s.
    pub fn from_tables(
        courses: &RawTable,
        prerequisites: &RawTable,
        tracks: &RawTable,
        minors: &RawTable,
    ) -> Self {
        let mut warnings = Vec::new();

        let (courses, course_index) = parse_courses(courses, &mut warnings);
        let prerequisites = parse_prerequisites(prerequisites, &mut warnings);
        let tracks = parse_tracks(tracks, &mut warnings);
        let minors = parse_minors(minors, &mut warnings);

        let mut catalog = Self {
            courses,
            course_index,
            prerequisites,
            tracks,
            minors,
            warnings,
        };
        catalog.check_references();
        catalog
    }

    /// Build a catalog from already typed records (tests, embedding).
    pub fn from_records(
        courses: Vec<Course>,
        prerequisites: Vec<PrerequisiteEdge>,
        tracks: Vec<TrackRequirement>,
        minors: Vec<MinorRequirement>,
    ) -> Self {
        let mut course_index = HashMap::new();
        for (idx, course) in courses.iter().enumerate() {
            course_index.entry(course.code.clone()).or_insert(idx);
        }
        Self {
            courses,
            course_index,
            prerequisites,
            tracks,
            minors,
            warnings: Vec::new(),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course by any spelling of its code.
    pub fn course(&self, code: &str) -> Option<&Course> {
        self.course_index
            .get(&normalize_code(code))
            .and_then(|idx| self.courses.get(*idx))
    }

    pub fn prerequisites(&self) -> &[PrerequisiteEdge] {
        &self.prerequisites
    }

    /// Edges whose dependent course is `code`.
    pub fn prerequisites_for<'a>(
        &'a self,
        code: &str,
    ) -> impl Iterator<Item = &'a PrerequisiteEdge> + use<'a> {
        let code = normalize_code(code);
        self.prerequisites
            .iter()
            .filter(move |edge| edge.course == code)
    }

    pub fn tracks(&self) -> &[TrackRequirement] {
        &self.tracks
    }

    pub fn minors(&self) -> &[MinorRequirement] {
        &self.minors
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    /// Courses whose `term_offered` cell matches `term`.
    pub fn courses_offered_in<'a>(
        &'a self,
        term: &str,
    ) -> impl Iterator<Item = &'a Course> + use<'a> {
        let term = normalize_label(term);
        self.courses
            .iter()
            .filter(move |course| normalize_label(&course.term_offered) == term)
    }

    fn check_references(&mut self) {
        if self.courses.is_empty() {
            return;
        }

        let mut unknown = BTreeSet::new();
        for edge in &self.prerequisites {
            for code in [&edge.course, &edge.required_course] {
                if !code.is_empty() && !self.course_index.contains_key(code) {
                    unknown.insert(("prerequisites", code.clone()));
                }
            }
        }
        for track in &self.tracks {
            for code in track.required_courses.iter().chain(&track.elective_pool) {
                if !self.course_index.contains_key(code) {
                    unknown.insert(("tracks", code.clone()));
                }
            }
        }
        for minor in &self.minors {
            for code in minor.mandatory_courses.iter().chain(&minor.choice_courses) {
                if !self.course_index.contains_key(code) {
                    unknown.insert(("minors", code.clone()));
                }
            }
        }

        for (range, code) in unknown {
            self.warnings.push(CatalogWarning::new(
                "unknown_course",
                range,
                None,
                format!("course '{code}' is not in the course list"),
            ));
        }
    }
}

fn parse_courses(
    table: &RawTable,
    warnings: &mut Vec<CatalogWarning>,
) -> (Vec<Course>, HashMap<String, usize>) {
    const RANGE: &str = "courses";
    let columns = table.columns();
    require_columns(&columns, RANGE, &[COURSE_CODE, CREDITS, COURSE_TYPE, PILLAR], warnings);

    let mut courses = Vec::with_capacity(table.rows.len());
    let mut course_index = HashMap::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let row_number = idx + 1;
        let code = normalize_code(columns.cell(row, COURSE_CODE));
        if code.is_empty() {
            warnings.push(CatalogWarning::new(
                "blank_code",
                RANGE,
                Some(row_number),
                "course row has no course code",
            ));
        }

        let course_type = columns
            .cell(row, COURSE_TYPE)
            .parse::<CourseType>()
            .unwrap_or_else(|err| {
                warnings.push(CatalogWarning::new(
                    "unknown_course_type",
                    RANGE,
                    Some(row_number),
                    format!("course '{code}': {err}"),
                ));
                CourseType::Unspecified
            });

        let course = Course {
            code: code.clone(),
            name: columns.cell(row, COURSE_NAME).to_string(),
            credits: count_cell(&columns, row, CREDITS, RANGE, row_number, warnings),
            course_type,
            term_offered: columns.cell(row, TERM_OFFERED).to_string(),
            pillar: normalize_label(columns.cell(row, PILLAR)),
            track_tags: label_list(columns.cell(row, TRACK_TAGS)),
            minor_tags: label_list(columns.cell(row, MINOR_TAGS)),
        };

        if !code.is_empty() {
            if course_index.contains_key(&code) {
                warnings.push(CatalogWarning::new(
                    "duplicate_course",
                    RANGE,
                    Some(row_number),
                    format!("course '{code}' appears more than once; keeping the first row"),
                ));
                continue;
            }
            course_index.insert(code, courses.len());
        }
        courses.push(course);
    }

    (courses, course_index)
}

fn parse_prerequisites(
    table: &RawTable,
    warnings: &mut Vec<CatalogWarning>,
) -> Vec<PrerequisiteEdge> {
    const RANGE: &str = "prerequisites";
    let columns = table.columns();
    require_columns(
        &columns,
        RANGE,
        &[PREREQ_COURSE, PREREQ_REQUIRED, PREREQ_KIND],
        warnings,
    );

    let mut edges = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let row_number = idx + 1;
        let course = normalize_code(columns.cell(row, PREREQ_COURSE));
        let required_course = normalize_code(columns.cell(row, PREREQ_REQUIRED));
        let kind = match columns.cell(row, PREREQ_KIND).parse::<PrereqKind>() {
            Ok(kind) => kind,
            Err(err) => {
                warnings.push(CatalogWarning::new(
                    "unknown_prereq_kind",
                    RANGE,
                    Some(row_number),
                    format!("{err}; expected Pre or Co, row skipped"),
                ));
                continue;
            }
        };

        if course.is_empty() || required_course.is_empty() {
            warnings.push(CatalogWarning::new(
                "blank_code",
                RANGE,
                Some(row_number),
                "prerequisite row is missing a course code",
            ));
        }

        edges.push(PrerequisiteEdge {
            course,
            required_course,
            kind,
        });
    }
    edges
}

fn parse_tracks(table: &RawTable, warnings: &mut Vec<CatalogWarning>) -> Vec<TrackRequirement> {
    const RANGE: &str = "tracks";
    let columns = table.columns();
    require_columns(
        &columns,
        RANGE,
        &[TRACK_NAME, REQUIRED_COURSES, MIN_COURSES_NEEDED, ELECTIVE_MIN],
        warnings,
    );

    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let row_number = idx + 1;
            TrackRequirement {
                track_name: columns.cell(row, TRACK_NAME).to_string(),
                choice_group: columns.cell(row, CHOICE_GROUP).to_string(),
                required_courses: normalize_list(columns.cell(row, REQUIRED_COURSES)),
                min_courses_needed: count_cell(
                    &columns,
                    row,
                    MIN_COURSES_NEEDED,
                    RANGE,
                    row_number,
                    warnings,
                ),
                elective_pool: normalize_list(columns.cell(row, ELECTIVE_POOL_CODES)),
                elective_pool_pillars: label_list(columns.cell(row, ELECTIVE_POOL_PILLARS)),
                elective_min: count_cell(&columns, row, ELECTIVE_MIN, RANGE, row_number, warnings),
            }
        })
        .collect()
}

fn parse_minors(table: &RawTable, warnings: &mut Vec<CatalogWarning>) -> Vec<MinorRequirement> {
    const RANGE: &str = "minors";
    let columns = table.columns();
    require_columns(
        &columns,
        RANGE,
        &[MINOR_NAME, MANDATORY_COURSES, CHOICE_COURSES, CHOICE_MIN],
        warnings,
    );

    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let row_number = idx + 1;
            MinorRequirement {
                minor_name: columns.cell(row, MINOR_NAME).to_string(),
                choice_group: columns.cell(row, CHOICE_GROUP).to_string(),
                mandatory_courses: normalize_list(columns.cell(row, MANDATORY_COURSES)),
                choice_courses: normalize_list(columns.cell(row, CHOICE_COURSES)),
                choice_min: count_cell(&columns, row, CHOICE_MIN, RANGE, row_number, warnings),
            }
        })
        .collect()
}

fn require_columns(
    columns: &ColumnIndex,
    range: &str,
    required: &[&[&str]],
    warnings: &mut Vec<CatalogWarning>,
) {
    let missing: Vec<&str> = required
        .iter()
        .filter(|aliases| !columns.has(aliases))
        .map(|aliases| aliases[0])
        .collect();

    if !missing.is_empty() {
        warnings.push(CatalogWarning::new(
            "missing_columns",
            range,
            None,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }
}

fn count_cell(
    columns: &ColumnIndex,
    row: &[String],
    aliases: &[&str],
    range: &str,
    row_number: usize,
    warnings: &mut Vec<CatalogWarning>,
) -> u32 {
    let raw = columns.cell(row, aliases);
    match parse_count(raw) {
        Some(value) => value,
        None => {
            if !raw.is_empty() {
                warnings.push(CatalogWarning::new(
                    "invalid_number",
                    range,
                    Some(row_number),
                    format!("{} '{raw}' is not a number; using 0", aliases[0]),
                ));
            }
            0
        }
    }
}

fn label_list(cell: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in cell.split(',').map(normalize_label) {
        if !label.is_empty() && label != "-" && !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
