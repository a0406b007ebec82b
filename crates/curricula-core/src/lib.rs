//! Core contracts and helpers for Curricula.
//!
//! This crate defines the canonical course and requirement records, the
//! normalizer every lookup goes through, and the typed reference catalog
//! shared by the loader, the validation engine, and the CLI.

pub mod catalog;
pub mod error;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod table;
pub mod template;

pub use catalog::{Catalog, CatalogWarning};
pub use error::{Error, Result};
pub use graph::{PrereqGraphReport, PrereqGraphSummary, build_prereq_graph_report};
pub use model::{
    Course, CourseType, MinorRequirement, PILLAR_HASS, PILLAR_ISTD, PrereqKind, PrerequisiteEdge,
    TrackRequirement,
};
pub use normalize::{normalize_code, normalize_label, normalize_list, parse_count};
pub use table::{ColumnIndex, RawTable};
pub use template::{TemplateRow, TermTemplate};
