use serde::{Deserialize, Serialize};

/// Provider range names for the four reference record sets and the optional
/// term template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeNames {
    pub courses: String,
    pub prerequisites: String,
    pub tracks: String,
    pub minors: String,
    pub term_template: String,
}

impl RangeNames {
    /// Every configured range, the term template last.
    pub fn all(&self) -> [&str; 5] {
        [
            self.courses.as_str(),
            self.prerequisites.as_str(),
            self.tracks.as_str(),
            self.minors.as_str(),
            self.term_template.as_str(),
        ]
    }
}

impl Default for RangeNames {
    fn default() -> Self {
        Self {
            courses: "Courses!A:H".to_string(),
            prerequisites: "Pre requisites!A:C".to_string(),
            tracks: "Tracks!A:G".to_string(),
            minors: "Minors!A:E".to_string(),
            term_template: "term template!A:E".to_string(),
        }
    }
}
