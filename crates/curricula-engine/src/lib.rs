//! Degree-requirement validation over a reference catalog.
//!
//! A selection is normalized once ([`selection`]), then checked for
//! prerequisite ordering ([`prereqs`]), matched against track and minor
//! requirements ([`requirements`]) and summed into credit buckets
//! ([`credits`]). [`ValidationEngine`] sequences the steps into a
//! [`ValidationReport`].

pub mod credits;
pub mod engine;
pub mod errors;
pub mod model;
pub mod prereqs;
pub mod requirements;
pub mod selection;

pub use credits::{CreditBucket, CreditStatus, CreditThresholds, CreditTotals, aggregate_credits};
pub use engine::{ValidationEngine, validate_request};
pub use errors::{EngineError, Result};
pub use model::{EngineOptions, ValidationReport, ValidationRequest};
pub use selection::{RawSelection, SelectedTerm, Selection};
